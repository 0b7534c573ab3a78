pub mod schema_server;
