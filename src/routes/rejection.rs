use serde::Serialize;
use warp::http::StatusCode;
use warp::reject;

use crate::errors::BackendError;

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: BackendError,
}

impl Rejection {
    pub fn new(context: Context, error: BackendError) -> Self {
        Rejection { context, error }
    }

    /// Server errors get a generic message so store details stay in
    /// the logs.
    pub fn flatten(&self, status: StatusCode) -> FlattenedRejection {
        let message = if status.is_server_error() {
            "internal server error".to_owned()
        } else {
            format!("{}", self.error)
        };

        FlattenedRejection {
            context: self.context.clone(),
            message,
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    #[serde(flatten)]
    pub(crate) context: Context,
    pub(crate) message: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Context {
    ByIngredient { ingredient: Option<String> },
    Create,
    Delete { id: String },
    List,
    Retrieve { id: String },
    Search { query: Option<String> },
    Update { id: String },
}

impl Context {
    pub fn by_ingredient(ingredient: Option<String>) -> Context {
        Context::ByIngredient { ingredient }
    }

    pub fn create() -> Context {
        Context::Create
    }

    pub fn delete(id: String) -> Context {
        Context::Delete { id }
    }

    pub fn list() -> Context {
        Context::List
    }

    pub fn retrieve(id: String) -> Context {
        Context::Retrieve { id }
    }

    pub fn search(query: Option<String>) -> Context {
        Context::Search { query }
    }

    pub fn update(id: String) -> Context {
        Context::Update { id }
    }
}
