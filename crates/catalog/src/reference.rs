use core::str::FromStr;

use serde::{Deserialize, Serialize};

use storefront_core::DomainError;

use crate::shipping::ShippingConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
}

/// Home page carousel slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    pub title: String,
    pub image: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub position: i32,
}

/// Store contact details (`settings/info` document).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub name: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
}

/// Kind of reference data held by the reference cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Categories,
    Subcategories,
    Brands,
    Slides,
    Info,
    Shipping,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 6] = [
        ReferenceKind::Categories,
        ReferenceKind::Subcategories,
        ReferenceKind::Brands,
        ReferenceKind::Slides,
        ReferenceKind::Info,
        ReferenceKind::Shipping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceKind::Categories => "categories",
            ReferenceKind::Subcategories => "subcategories",
            ReferenceKind::Brands => "brands",
            ReferenceKind::Slides => "slides",
            ReferenceKind::Info => "info",
            ReferenceKind::Shipping => "shipping",
        }
    }

    /// Store settings are singleton documents; the rest are collections.
    pub fn is_setting(self) -> bool {
        matches!(self, ReferenceKind::Info | ReferenceKind::Shipping)
    }
}

impl core::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferenceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReferenceKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown reference kind '{s}'")))
    }
}

/// A fetched reference value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReferenceData {
    Categories(Vec<Category>),
    Subcategories(Vec<Subcategory>),
    Brands(Vec<Brand>),
    Slides(Vec<Slide>),
    Info(StoreInfo),
    Shipping(ShippingConfig),
}

impl ReferenceData {
    pub fn kind(&self) -> ReferenceKind {
        match self {
            ReferenceData::Categories(_) => ReferenceKind::Categories,
            ReferenceData::Subcategories(_) => ReferenceKind::Subcategories,
            ReferenceData::Brands(_) => ReferenceKind::Brands,
            ReferenceData::Slides(_) => ReferenceKind::Slides,
            ReferenceData::Info(_) => ReferenceKind::Info,
            ReferenceData::Shipping(_) => ReferenceKind::Shipping,
        }
    }

    pub fn as_categories(&self) -> Option<&[Category]> {
        match self {
            ReferenceData::Categories(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_subcategories(&self) -> Option<&[Subcategory]> {
        match self {
            ReferenceData::Subcategories(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_brands(&self) -> Option<&[Brand]> {
        match self {
            ReferenceData::Brands(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_slides(&self) -> Option<&[Slide]> {
        match self {
            ReferenceData::Slides(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_info(&self) -> Option<&StoreInfo> {
        match self {
            ReferenceData::Info(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_shipping(&self) -> Option<&ShippingConfig> {
        match self {
            ReferenceData::Shipping(v) => Some(v),
            _ => None,
        }
    }
}
