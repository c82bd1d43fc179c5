mod broadcast;
mod error;
