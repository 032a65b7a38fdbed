pub mod deployment_watch;
pub mod poller;
