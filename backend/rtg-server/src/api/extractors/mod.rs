pub mod broadcast_caller;
pub mod system_caller;
