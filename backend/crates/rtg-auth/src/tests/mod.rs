mod webhook_signature;
