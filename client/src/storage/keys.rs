//! Fixed storage keys

pub const SERVER_ADDRESS: &str = "server_address";
pub const API_TOKEN: &str = "api_token";
pub const SETUP_COMPLETE: &str = "setup_complete";
pub const FAVORITES: &str = "favorites";
pub const SELECTED_TEAM: &str = "selected_team";
pub const PERMISSIONS_ACKNOWLEDGED: &str = "permissions_acknowledged";
pub const LOGS_REFETCH_INTERVAL: &str = "logs_refetch_interval";
pub const SELECTED_SERVER: &str = "selected_server";
