pub mod tenant_guard;
