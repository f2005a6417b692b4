use serde::Deserialize;

/// Vacancy detail as served by the ATS. The three long-form sections carry
/// HTML that must be stripped before the text reaches a prompt.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Vacancy {
    pub position: Option<String>,
    pub money: Option<String>,
    pub body: Option<String>,
    pub requirements: Option<String>,
    pub conditions: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VacancyListItem {
    pub id: i64,
    #[serde(default)]
    pub position: Option<String>,
}
