use mission_core::Language;

/// Role catalog offered to the user, grouped by sector.
pub const ROLE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Tech & IT",
        &[
            "Frontend Developer",
            "Backend Developer",
            "Fullstack Developer",
            "DevOps Engineer",
            "Data Scientist",
            "Mobile Developer",
        ],
    ),
    (
        "Healthcare",
        &["Nurse", "Doctor", "Pharmacist", "Physiotherapist"],
    ),
    (
        "Trade & Skilled",
        &["Electrician", "Plumber", "Carpenter", "Construction Worker"],
    ),
    (
        "Business & MGMT",
        &[
            "Project Manager",
            "Product Manager",
            "Marketing Manager",
            "HR Specialist",
        ],
    ),
];

pub const STRICT_MODE_NOTE: &str =
    "Strict mode active: German requirements will be auto-discarded";

pub const PROGRESS_BAR_WIDTH: usize = 20;

pub const HELP_LINES: &[&str] = &[
    "Commands:",
    "  launch              start a search mission with the current filters",
    "  toggle <role>       add or remove a role",
    "  location <text>     set the geographic focus",
    "  language <name>     English, German, French, Spanish, Italian or All",
    "  roles               list the role catalog",
    "  refresh             reload the recent leads",
    "  export              save the finished report",
    "  help                show this text",
    "  quit                leave the monitor",
];

pub fn language_label(language: Language) -> &'static str {
    match language {
        Language::English => "English Only",
        Language::German => "German",
        Language::French => "French",
        Language::Spanish => "Spanish",
        Language::Italian => "Italian",
        Language::All => "All Languages",
    }
}

/// Canonical catalog spelling of `raw`, if the catalog knows it.
pub fn catalog_role(raw: &str) -> Option<&'static str> {
    ROLE_CATEGORIES
        .iter()
        .flat_map(|(_, roles)| roles.iter())
        .find(|role| role.eq_ignore_ascii_case(raw))
        .copied()
}
