//! Catalog reference data: the read-mostly records the storefront renders on
//! every page (categories, brands, slides, store info, shipping settings).

pub mod reference;
pub mod shipping;

pub use reference::{Brand, Category, ReferenceData, ReferenceKind, Slide, StoreInfo, Subcategory};
pub use shipping::ShippingConfig;
