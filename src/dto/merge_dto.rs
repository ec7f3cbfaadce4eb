use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_bool_flexible<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrInt {
        Bool(bool),
        Int(i64),
        String(String),
    }

    match Option::<BoolOrInt>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrInt::Bool(b)) => Ok(Some(b)),
        Some(BoolOrInt::Int(i)) => Ok(Some(i != 0)),
        Some(BoolOrInt::String(s)) => match s.as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(serde::de::Error::custom(format!("Invalid boolean string: {}", s))),
        },
    }
}

/// One page of a Merge list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub results: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeEmail {
    #[serde(rename = "type", alias = "email_address_type", default)]
    pub email_type: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergePhoneNumber {
    #[serde(rename = "type", alias = "phone_number_type", default)]
    pub phone_type: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeCandidate {
    pub remote_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub emails: Vec<MergeEmail>,
    #[serde(deserialize_with = "null_as_default")]
    pub phone_numbers: Vec<MergePhoneNumber>,
    pub current_title: Option<String>,
    pub current_company: Option<String>,
    pub resume_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    pub years_experience: Option<i32>,
    #[serde(deserialize_with = "null_as_default")]
    pub past_titles: Vec<String>,
}

impl MergeCandidate {
    /// The primary email, else the first one listed.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails
            .iter()
            .find(|e| {
                e.email_type
                    .as_deref()
                    .is_some_and(|t| t.eq_ignore_ascii_case("primary"))
            })
            .or_else(|| self.emails.first())
            .and_then(|e| e.value.as_deref())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeJobPosting {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub job_posting_url: Option<String>,
    pub code: Option<String>,
    pub location: Option<String>,
    #[serde(deserialize_with = "deserialize_bool_flexible")]
    pub remote: Option<bool>,
    pub status: Option<String>,
    pub hiring_manager: Option<String>,
    pub created_at: Option<String>,
    pub modified_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeApplication {
    pub id: Option<String>,
    /// Merge candidate id.
    pub candidate: Option<String>,
    /// Merge job id.
    pub job: Option<String>,
    pub status: Option<String>,
    pub applied_at: Option<String>,
    pub modified_at: Option<String>,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeInterview {
    pub id: Option<String>,
    /// Merge application id.
    pub application: Option<String>,
    pub interviewer: Option<String>,
    pub organizer: Option<String>,
    pub status: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub interview_type: Option<String>,
    pub result: Option<String>,
    pub feedback: Option<String>,
    pub remote_created_at: Option<String>,
    pub remote_updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_tolerates_nulls() {
        let page: Page<MergeCandidate> = serde_json::from_value(json!({
            "results": [{"remote_id": "r1", "emails": null, "skills": null}],
            "next": null
        }))
        .unwrap();
        assert_eq!(page.results.len(), 1);
        assert!(page.results[0].emails.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn primary_email_falls_back_to_first() {
        let candidate: MergeCandidate = serde_json::from_value(json!({
            "emails": [
                {"type": "work", "value": "work@example.com"},
                {"email_address_type": "PRIMARY", "value": "me@example.com"}
            ]
        }))
        .unwrap();
        assert_eq!(candidate.primary_email(), Some("me@example.com"));

        let only_work: MergeCandidate = serde_json::from_value(json!({
            "emails": [{"type": "work", "value": "work@example.com"}]
        }))
        .unwrap();
        assert_eq!(only_work.primary_email(), Some("work@example.com"));
    }

    #[test]
    fn remote_flag_accepts_ints_and_strings() {
        let job: MergeJobPosting = serde_json::from_value(json!({"remote": 1})).unwrap();
        assert_eq!(job.remote, Some(true));
        let job: MergeJobPosting = serde_json::from_value(json!({"remote": "false"})).unwrap();
        assert_eq!(job.remote, Some(false));
        let job: MergeJobPosting = serde_json::from_value(json!({"remote": null})).unwrap();
        assert_eq!(job.remote, None);
    }
}
