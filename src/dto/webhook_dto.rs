use serde::Deserialize;

/// Inbound Huntflow webhook payload. Only the fields the gate consumes are
/// modelled; everything is optional so filtering can name what is missing
/// instead of failing the parse.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicantWebhook {
    pub event: WebhookEventBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookEventBody {
    pub applicant_log: ApplicantLog,
    pub applicant: IdRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicantLog {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: NameRef,
    pub vacancy: IdRef,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IdRef {
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NameRef {
    pub name: Option<String>,
}
