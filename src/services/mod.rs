pub mod validation;

pub mod account_service;
pub mod account_service_impl;
pub use account_service::{AccountError, AccountService, UserInfo};
pub use account_service_impl::SeaOrmAccountService;

pub mod preference_service;
pub mod preference_service_impl;
pub use preference_service::{PreferenceError, PreferenceService};
pub use preference_service_impl::SeaOrmPreferenceService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService, CourseInfo, SampleCourses};
pub use catalog_service_impl::SeaOrmCatalogService;
