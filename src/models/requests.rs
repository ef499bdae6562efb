//! Request argument models for the data endpoints
//!
//! Arguments arrive as raw query pairs so repeated keys such as
//! `credits=gte.3&credits=lte.4` survive parsing.

use crate::error::{ApiError, Result};

/// Page size used when `limit` is absent or zero.
pub const DEFAULT_LIMIT: u16 = 100;

/// Largest accepted page size.
pub const MAX_LIMIT: u16 = 500;

const MALFORMED_MESSAGE: &str = "Malformed query parameters. Check types and ranges.";

// == Query Pairs ==
/// Decoded query pairs in request order.
#[derive(Debug, Clone, Copy)]
pub struct QueryPairs<'a>(&'a [(String, String)]);

impl<'a> QueryPairs<'a> {
    pub fn new(pairs: &'a [(String, String)]) -> Self {
        Self(pairs)
    }

    /// First value for `name`, as gin's form binding does for scalar fields.
    pub fn first(&self, name: &str) -> Option<&'a str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value for `name`, in order.
    pub fn all(&self, name: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .collect()
    }

    fn string(&self, name: &str) -> String {
        self.first(name).unwrap_or_default().to_string()
    }

    fn number(&self, name: &str) -> Result<u16> {
        match self.first(name) {
            None | Some("") => Ok(0),
            Some(raw) => raw
                .parse()
                .map_err(|_| ApiError::InvalidArgs(MALFORMED_MESSAGE.to_string())),
        }
    }

    fn flag(&self, name: &str) -> Result<bool> {
        match self.first(name) {
            None | Some("") => Ok(false),
            Some("1" | "t" | "T" | "true" | "TRUE" | "True") => Ok(true),
            Some("0" | "f" | "F" | "false" | "FALSE" | "False") => Ok(false),
            Some(_) => Err(ApiError::InvalidArgs(MALFORMED_MESSAGE.to_string())),
        }
    }

    /// Page size: zero or absent means [`DEFAULT_LIMIT`]; above [`MAX_LIMIT`] is rejected.
    fn limit(&self) -> Result<u16> {
        match self.number("limit")? {
            0 => Ok(DEFAULT_LIMIT),
            limit if limit > MAX_LIMIT => Err(ApiError::InvalidArgs(format!(
                "Invalid fields: limit: must be between 1 and {}",
                MAX_LIMIT
            ))),
            limit => Ok(limit),
        }
    }
}

// == Courses ==
/// Arguments for listing courses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursesArgs {
    /// Comma-separated course codes
    pub course_codes: String,
    /// Department prefix, e.g. `CMSC`
    pub prefix: String,
    /// Course number, e.g. `131`
    pub number: String,
    /// Comma-separated GenEd codes
    pub gen_eds: String,
    /// Credit conditions, e.g. `eq.3`
    pub credits: Vec<String>,
    pub limit: u16,
    pub offset: u16,
    pub sort_by: String,
}

impl CoursesArgs {
    pub fn from_query(query: QueryPairs<'_>) -> Result<Self> {
        let args = Self {
            course_codes: query.string("courseCodes"),
            prefix: query.string("prefix"),
            number: query.string("number"),
            gen_eds: query.string("genEds"),
            credits: query.all("credits"),
            limit: query.limit()?,
            offset: query.number("offset")?,
            sort_by: query.string("sortBy"),
        };
        args.validate()?;
        Ok(args)
    }

    /// Rejects combinations of course selectors.
    pub fn validate(&self) -> Result<()> {
        let codes = !self.course_codes.is_empty();
        let prefix = !self.prefix.is_empty();
        let number = !self.number.is_empty();

        let message = match (codes, prefix, number) {
            (true, true, true) => "Cannot specify courseCodes, prefix, and number simultaneously",
            (true, true, false) => "Cannot specify both courseCodes and prefix",
            (true, false, true) => "Cannot specify both courseCodes and number",
            (false, true, true) => "Cannot specify both prefix and number",
            _ => return Ok(()),
        };
        Err(ApiError::InvalidArgs(message.to_string()))
    }
}

// == Sections ==
/// Arguments for listing sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionsArgs {
    pub course_codes: String,
    pub prefix: String,
    pub limit: u16,
    pub offset: u16,
    pub sort_by: String,
    /// Class size conditions, e.g. `lt.30`
    pub total_class_size: Vec<String>,
    pub only_open: bool,
    /// Exact instructor name, case sensitive
    pub instructor: String,
}

impl SectionsArgs {
    pub fn from_query(query: QueryPairs<'_>) -> Result<Self> {
        Ok(Self {
            course_codes: query.string("courseCodes"),
            prefix: query.string("prefix"),
            limit: query.limit()?,
            offset: query.number("offset")?,
            sort_by: query.string("sortBy"),
            total_class_size: query.all("totalClassSize"),
            only_open: query.flag("onlyOpen")?,
            instructor: query.string("instructor"),
        })
    }
}

// == Instructors ==
/// Arguments for listing instructors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructorArgs {
    pub instructor_names: String,
    pub instructor_slugs: String,
    /// Rating conditions, e.g. `gt.3.5`
    pub ratings: Vec<String>,
    pub limit: u16,
    pub offset: u16,
    pub sort_by: String,
}

impl InstructorArgs {
    pub fn from_query(query: QueryPairs<'_>) -> Result<Self> {
        let args = Self {
            instructor_names: query.string("instructorNames"),
            instructor_slugs: query.string("instructorSlugs"),
            ratings: query.all("ratings"),
            limit: query.limit()?,
            offset: query.number("offset")?,
            sort_by: query.string("sortBy"),
        };
        if !args.instructor_names.is_empty() && !args.instructor_slugs.is_empty() {
            return Err(ApiError::InvalidArgs(
                "Cannot specify both instructorNames and instructorSlugs".to_string(),
            ));
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn error_message(result: Result<impl std::fmt::Debug>) -> String {
        match result {
            Err(ApiError::InvalidArgs(msg)) => msg,
            other => panic!("expected InvalidArgs, got {:?}", other),
        }
    }

    #[test]
    fn test_courses_defaults() {
        let raw = pairs(&[]);
        let args = CoursesArgs::from_query(QueryPairs::new(&raw)).unwrap();
        assert_eq!(args.limit, DEFAULT_LIMIT);
        assert_eq!(args.offset, 0);
        assert!(args.credits.is_empty());
    }

    #[test]
    fn test_courses_repeated_credits() {
        let raw = pairs(&[("credits", "gte.3"), ("prefix", "CMSC"), ("credits", "lte.4")]);
        let args = CoursesArgs::from_query(QueryPairs::new(&raw)).unwrap();
        assert_eq!(args.credits, vec!["gte.3", "lte.4"]);
        assert_eq!(args.prefix, "CMSC");
    }

    #[test]
    fn test_courses_conflicting_selectors() {
        let raw = pairs(&[("prefix", "CMSC"), ("number", "131")]);
        let msg = error_message(CoursesArgs::from_query(QueryPairs::new(&raw)));
        assert_eq!(msg, "Cannot specify both prefix and number");

        let raw = pairs(&[("courseCodes", "CMSC131"), ("prefix", "CMSC"), ("number", "131")]);
        let msg = error_message(CoursesArgs::from_query(QueryPairs::new(&raw)));
        assert_eq!(msg, "Cannot specify courseCodes, prefix, and number simultaneously");
    }

    #[test]
    fn test_limit_bounds() {
        let raw = pairs(&[("limit", "500")]);
        assert_eq!(CoursesArgs::from_query(QueryPairs::new(&raw)).unwrap().limit, 500);

        let raw = pairs(&[("limit", "501")]);
        let msg = error_message(CoursesArgs::from_query(QueryPairs::new(&raw)));
        assert!(msg.starts_with("Invalid fields: limit"));

        let raw = pairs(&[("limit", "0")]);
        assert_eq!(
            CoursesArgs::from_query(QueryPairs::new(&raw)).unwrap().limit,
            DEFAULT_LIMIT
        );
    }

    #[test]
    fn test_malformed_numbers() {
        for bad in ["abc", "-1", "70000"] {
            let raw = pairs(&[("offset", bad)]);
            let msg = error_message(SectionsArgs::from_query(QueryPairs::new(&raw)));
            assert_eq!(msg, MALFORMED_MESSAGE);
        }
    }

    #[test]
    fn test_sections_only_open_flag() {
        let raw = pairs(&[("onlyOpen", "true"), ("totalClassSize", "lt.30")]);
        let args = SectionsArgs::from_query(QueryPairs::new(&raw)).unwrap();
        assert!(args.only_open);
        assert_eq!(args.total_class_size, vec!["lt.30"]);

        let raw = pairs(&[("onlyOpen", "maybe")]);
        assert!(SectionsArgs::from_query(QueryPairs::new(&raw)).is_err());
    }

    #[test]
    fn test_instructors_names_and_slugs_conflict() {
        let raw = pairs(&[("instructorNames", "Jane Doe"), ("instructorSlugs", "doe")]);
        let msg = error_message(InstructorArgs::from_query(QueryPairs::new(&raw)));
        assert!(msg.contains("instructorNames"));
    }
}
