use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Regions offered as filter choices.
pub const REGIONS: [&str; 4] = ["RM", "V", "VIII", "X"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Internship,
    #[serde(rename = "Part-time")]
    PartTime,
    Volunteer,
    #[serde(rename = "Full-time")]
    FullTime,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Internship,
        Category::PartTime,
        Category::Volunteer,
        Category::FullTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Internship => "Internship",
            Category::PartTime => "Part-time",
            Category::Volunteer => "Volunteer",
            Category::FullTime => "Full-time",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Invalid category: {}. Expected: Internship, Part-time, Volunteer, or Full-time",
                    s
                )
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub organization: String,
    pub region: String,
    pub locality: String,
    pub category: Category,
    pub work_mode: String,
    pub hours_per_week: String,
    pub requirements: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    UnderReview,
    Interview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::UnderReview,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::UnderReview => "Under review",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "review" | "underreview" | "under review" | "under-review" => {
                Ok(ApplicationStatus::UnderReview)
            }
            "interview" => Ok(ApplicationStatus::Interview),
            "offer" => Ok(ApplicationStatus::Offer),
            "reject" | "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!(
                "Invalid status: {}. Expected: review, interview, offer, or reject",
                other
            )),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub status: ApplicationStatus,
    pub timestamp: String,
}

/// A candidate's submission to a listing. Carries a copy of the listing as it
/// was when the candidate applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(flatten)]
    pub listing: JobListing,
    pub status: ApplicationStatus,
    pub applied_at: String,
    pub history: Vec<HistoryEntry>,
}

impl Application {
    pub fn id(&self) -> &str {
        &self.listing.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    Pending,
    Earned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    pub name: String,
    pub status: CredentialStatus,
    pub description: String,
}

impl Credential {
    pub fn is_earned(&self) -> bool {
        self.status == CredentialStatus::Earned
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub field_of_study: String,
    pub locality: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Candidate,
    Organization,
}

impl Role {
    pub fn toggled(self) -> Self {
        match self {
            Role::Candidate => Role::Organization,
            Role::Organization => Role::Candidate,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "Candidate",
            Role::Organization => "Organization",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Views of the browser. Persisted by name; a name this build does not know
/// fails to deserialize and the caller falls back to `Explore`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tab {
    #[default]
    Explore,
    Applications,
    Credentials,
    Profile,
    Publish,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Explore,
        Tab::Applications,
        Tab::Credentials,
        Tab::Profile,
        Tab::Publish,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Explore => "Explore",
            Tab::Applications => "Applications",
            Tab::Credentials => "Micro-credentials",
            Tab::Profile => "Profile",
            Tab::Publish => "Publish (Organization)",
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// The publish form as the organization fills it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDraft {
    pub title: String,
    pub organization: String,
    pub region: String,
    pub locality: String,
    pub category: Category,
    pub work_mode: String,
    pub hours_per_week: String,
    /// Comma-separated, as typed.
    pub requirements: String,
    pub description: String,
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            organization: String::new(),
            region: "RM".to_string(),
            locality: String::new(),
            category: Category::Internship,
            work_mode: "On-site".to_string(),
            hours_per_week: "20 h/week".to_string(),
            requirements: String::new(),
            description: String::new(),
        }
    }
}

impl ListingDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<&'static str> = [
            ("title", &self.title),
            ("locality", &self.locality),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Turn the form into a listing under `id`. Nothing is built unless the
    /// required fields are present.
    pub fn into_listing(self, id: String) -> Result<JobListing, ValidationError> {
        self.validate()?;
        Ok(JobListing {
            id,
            title: self.title.trim().to_string(),
            organization: self.organization.trim().to_string(),
            region: self.region.trim().to_string(),
            locality: self.locality.trim().to_string(),
            category: self.category,
            work_mode: self.work_mode.trim().to_string(),
            hours_per_week: self.hours_per_week.trim().to_string(),
            requirements: split_requirements(&self.requirements),
            description: self.description.trim().to_string(),
        })
    }
}

pub fn split_requirements(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
