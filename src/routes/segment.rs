use std::str::FromStr;

/// Sub-collection names under `/api/recipes/` that can never be recipe IDs.
const RESERVED: &[&str] = &["search", "by-ingredient"];

/// The `{id}` segment of a single-recipe path, unparsed.
///
/// Reserved names fail to parse, so warp treats the path as unmatched
/// and the lookup routes keep ownership of their own errors.
#[derive(Debug)]
pub struct IdSegment(String);

impl IdSegment {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for IdSegment {
    type Err = ();

    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        if RESERVED.contains(&segment) {
            Err(())
        } else {
            Ok(IdSegment(segment.to_owned()))
        }
    }
}
