use chrono::NaiveDate;
use clap::ValueEnum;

use crate::error::{Error, Result};

pub const MAX_VIEWS: u64 = 6_000_000_000;
pub const MIN_LIKES: u64 = 30;
pub const MAX_LIKES: u64 = 6_000_000_000;
pub const MIN_DURATION: u32 = 1;
pub const MAX_DURATION: u32 = 86_400;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LicenseType {
    Any,
    YoutubeLicense,
    CreativeCommons,
}

impl LicenseType {
    /// Numeric code the search endpoint expects for the `license` parameter.
    pub fn code(&self) -> &'static str {
        match self {
            LicenseType::Any => "0",
            LicenseType::YoutubeLicense => "1",
            LicenseType::CreativeCommons => "2",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortField {
    UploadDate,
    Id,
    ViewCount,
    LikeCount,
    ChanRank,
    Duration,
}

impl SortField {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortField::UploadDate => "uploaddate",
            SortField::Id => "id",
            SortField::ViewCount => "viewcount",
            SortField::LikeCount => "likecount",
            SortField::ChanRank => "chanrank",
            SortField::Duration => "duration",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    Desc,
    Asc,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Desc => "desc",
            SortOrder::Asc => "asc",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOption {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortOption {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        SortOption { field, order }
    }
}

/// Filtering parameters for a search query. The numeric bounds are contracts
/// of the search endpoint and are checked when a range is set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filters {
    title: Option<String>,
    views: Option<(u64, u64)>,
    likes: Option<(u64, u64)>,
    duration: Option<(u32, u32)>,
    date_range: Option<(NaiveDate, NaiveDate)>,
    license: Option<LicenseType>,
}

impl Filters {
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_owned());
    }

    pub fn set_views(&mut self, min_views: u64, max_views: u64) -> Result<()> {
        if max_views > MAX_VIEWS {
            return Err(Error::InvalidFilter(format!(
                "max_views must be <= {MAX_VIEWS}"
            )));
        }
        if min_views > max_views {
            return Err(Error::InvalidFilter(
                "min_views cannot be greater than max_views".to_owned(),
            ));
        }
        self.views = Some((min_views, max_views));
        Ok(())
    }

    pub fn set_likes(&mut self, min_likes: u64, max_likes: u64) -> Result<()> {
        if min_likes < MIN_LIKES {
            return Err(Error::InvalidFilter(format!(
                "min_likes must be >= {MIN_LIKES}"
            )));
        }
        if max_likes > MAX_LIKES {
            return Err(Error::InvalidFilter(format!(
                "max_likes must be <= {MAX_LIKES}"
            )));
        }
        if min_likes > max_likes {
            return Err(Error::InvalidFilter(
                "min_likes cannot be greater than max_likes".to_owned(),
            ));
        }
        self.likes = Some((min_likes, max_likes));
        Ok(())
    }

    pub fn set_duration(&mut self, start_duration: u32, end_duration: u32) -> Result<()> {
        if start_duration < MIN_DURATION {
            return Err(Error::InvalidFilter(format!(
                "start_duration must be >= {MIN_DURATION}"
            )));
        }
        if end_duration > MAX_DURATION {
            return Err(Error::InvalidFilter(format!(
                "end_duration must be <= {MAX_DURATION}"
            )));
        }
        if start_duration > end_duration {
            return Err(Error::InvalidFilter(
                "start_duration cannot be greater than end_duration".to_owned(),
            ));
        }
        self.duration = Some((start_duration, end_duration));
        Ok(())
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<()> {
        if start > end {
            return Err(Error::InvalidFilter(
                "start_date cannot be later than end_date".to_owned(),
            ));
        }
        self.date_range = Some((start, end));
        Ok(())
    }

    pub fn set_license(&mut self, license: LicenseType) {
        self.license = Some(license);
    }

    /// Serializes the configured filters as wire parameters, in the order the
    /// search endpoint lists them.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(title) = &self.title {
            params.push(("title", title.clone()));
        }
        if let Some((start, end)) = self.duration {
            params.push(("startDuration", start.to_string()));
            params.push(("endDuration", end.to_string()));
        }
        if let Some((min, max)) = self.views {
            params.push(("minViews", min.to_string()));
            params.push(("maxViews", max.to_string()));
        }
        if let Some((min, max)) = self.likes {
            params.push(("minLikes", min.to_string()));
            params.push(("maxLikes", max.to_string()));
        }
        if let Some((start, end)) = self.date_range {
            params.push(("startDate", start.to_string()));
            params.push(("endDate", end.to_string()));
        }
        if let Some(license) = self.license {
            params.push(("license", license.code().to_owned()));
        }
        params
    }
}
