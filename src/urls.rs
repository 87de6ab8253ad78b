use url::Url;
use uuid::Uuid;

/// Convenience wrapper for URL generation functions.
#[derive(Clone, Debug)]
pub struct Urls {
    /// Recipe collection URL, including trailing slash.
    recipes: Url,
}

impl Urls {
    /// Create a new instance rooted at `base`, which should be the
    /// public origin of the API.
    pub fn new(base: &Url) -> Result<Self, url::ParseError> {
        let recipes = base.join("/api/recipes/")?;

        Ok(Urls { recipes })
    }

    /// The canonical location of a stored recipe.
    pub fn recipe(&self, id: &Uuid) -> Url {
        let mut url = self.recipes.clone();

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }

        url
    }
}

#[cfg(test)]
mod tests {
    use url::Url;
    use uuid::Uuid;

    use super::Urls;

    #[test]
    fn recipe_urls_sit_under_the_api() {
        let base = Url::parse("https://shaker.example/ignored/path").expect("parse base");
        let urls = Urls::new(&base).expect("build URLs");
        let id = Uuid::new_v4();

        assert_eq!(
            urls.recipe(&id).as_str(),
            format!("https://shaker.example/api/recipes/{}", id)
        );
    }
}
