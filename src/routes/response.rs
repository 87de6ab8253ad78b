use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    Health {
        status: &'a str,
        database: &'a str,
    },
}
