//! Pooled HTTP transport shared by every request of a client.

mod connection;

pub use connection::{
    ConnectionManager, ConnectionManagerBuilder, Transport, MAX_CONCURRENT_REQUESTS,
    MAX_IDLE_PER_HOST, REQUEST_TIMEOUT, USER_AGENT,
};
