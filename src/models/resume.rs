use serde::Deserialize;

/// Huntflow sometimes sends a geo field as a plain string and sometimes as
/// an object with a `name` key. Both shapes collapse to one string here.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NamedOrPlain {
    Named { name: Option<String> },
    Plain(String),
}

impl NamedOrPlain {
    pub fn as_str(&self) -> &str {
        match self {
            NamedOrPlain::Named { name } => name.as_deref().unwrap_or(""),
            NamedOrPlain::Plain(value) => value,
        }
    }
}

/// Partial date in the unified resume format. `precision` controls how much
/// of the date the formatter renders.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PartialDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub precision: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SalaryAmount {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for SalaryAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SalaryAmount::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            SalaryAmount::Number(n) => write!(f, "{}", n),
            SalaryAmount::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WantedSalary {
    pub amount: Option<SalaryAmount>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Area {
    pub country: Option<NamedOrPlain>,
    pub city: Option<NamedOrPlain>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Relocation {
    #[serde(rename = "type")]
    pub kind: Option<NamedOrPlain>,
    pub area: Vec<Area>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub date_from: Option<PartialDate>,
    pub date_to: Option<PartialDate>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub name: Option<String>,
    pub faculty: Option<String>,
    pub date_from: Option<PartialDate>,
    pub date_to: Option<PartialDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Education {
    pub higher: Vec<EducationEntry>,
}

/// Unified resume document. Every field is optional; the formatters apply
/// the defaulting rules, so a tolerant parse never fails on missing keys.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Resume {
    pub position: Option<String>,
    pub wanted_salary: Option<WantedSalary>,
    pub area: Option<Area>,
    pub relocation: Option<Relocation>,
    pub skill_set: Vec<String>,
    pub experience: Vec<Experience>,
    pub education: Option<Education>,
}

/// Response of the resume-by-external-id endpoint: the unified document is
/// nested under a `resume` key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExternalResume {
    pub resume: Option<Resume>,
}
