/// Location log entity module
pub mod location_log;
/// Seller entity module
pub mod seller;
/// Work session entity module
pub mod work_session;

pub use location_log::Entity as LocationLog;
pub use seller::Entity as Seller;
pub use work_session::Entity as WorkSession;
