use crate::models::{Category, Credential, CredentialStatus, JobListing, Profile};

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    title: &str,
    organization: &str,
    region: &str,
    locality: &str,
    category: Category,
    work_mode: &str,
    hours_per_week: &str,
    requirements: &[&str],
    description: &str,
) -> JobListing {
    JobListing {
        id: id.to_string(),
        title: title.to_string(),
        organization: organization.to_string(),
        region: region.to_string(),
        locality: locality.to_string(),
        category,
        work_mode: work_mode.to_string(),
        hours_per_week: hours_per_week.to_string(),
        requirements: requirements.iter().map(|r| r.to_string()).collect(),
        description: description.to_string(),
    }
}

pub fn seed_jobs() -> Vec<JobListing> {
    vec![
        listing(
            "J-001",
            "Frontend Developer Internship",
            "StartUp Verde",
            "RM",
            "Santiago",
            Category::Internship,
            "Hybrid",
            "30 h/week",
            &["HTML/CSS", "JavaScript", "Teamwork"],
            "Help build landing pages and UI components. Mentoring from a senior developer and a chance to stay on.",
        ),
        listing(
            "J-002",
            "Part-time IT Support (Weekends)",
            "RetailPlus",
            "RM",
            "Puente Alto",
            Category::PartTime,
            "On-site",
            "16 h/week",
            &["Customer service", "Basic troubleshooting", "Reliability"],
            "Support users on the sales floor. Ideal for students with weekday classes.",
        ),
        listing(
            "J-003",
            "Digital Literacy Volunteer",
            "Fundación Conecta",
            "V",
            "Valparaíso",
            Category::Volunteer,
            "Field",
            "6 h/week",
            &["Patience", "Communication", "Basic office software"],
            "Help run workshops on using the internet and basic tools for older adults.",
        ),
        listing(
            "J-004",
            "Junior Data Analyst",
            "FinData",
            "RM",
            "Providencia",
            Category::FullTime,
            "Remote",
            "40 h/week",
            &["Excel/Sheets", "Basic SQL", "Analytical thinking"],
            "Analysis of reports and dashboards. Three-month training program.",
        ),
        listing(
            "J-005",
            "QA Tester Internship",
            "TechQuality",
            "VIII",
            "Concepción",
            Category::Internship,
            "On-site",
            "20 h/week",
            &["Test cases", "Attention to detail", "Reliability"],
            "Run manual tests and report bugs.",
        ),
        listing(
            "J-006",
            "Math Tutoring Volunteer",
            "Fundación Educa+",
            "X",
            "Puerto Montt",
            Category::Volunteer,
            "Field",
            "4 h/week",
            &["Communication", "Basic algebra"],
            "After-school tutoring in public high schools.",
        ),
    ]
}

pub fn seed_credentials() -> Vec<Credential> {
    [
        ("C-001", "Teamwork", "Collaborates and shares responsibilities."),
        ("C-002", "Effective communication", "Explains ideas clearly."),
        ("C-003", "Critical thinking", "Analyzes problems and proposes solutions."),
    ]
    .into_iter()
    .map(|(id, name, description)| Credential {
        id: id.to_string(),
        name: name.to_string(),
        status: CredentialStatus::Pending,
        description: description.to_string(),
    })
    .collect()
}

pub fn default_profile() -> Profile {
    Profile {
        name: "Daniela Soto".to_string(),
        email: "daniela@example.com".to_string(),
        field_of_study: "Computer Engineering".to_string(),
        locality: "Santiago".to_string(),
    }
}
