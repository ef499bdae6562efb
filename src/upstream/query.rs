//! PostgREST query construction for each resource.

use super::Params;
use crate::models::{CoursesArgs, InstructorArgs, SectionsArgs};

pub const COURSES_TABLE: &str = "Courses";
pub const SECTIONS_TABLE: &str = "Sections";
pub const INSTRUCTORS_TABLE: &str = "instructors";
pub const ACTIVE_INSTRUCTORS_TABLE: &str = "active_instructors";
pub const DEPARTMENTS_TABLE: &str = "Departments";

/// Splits a comma-separated argument, dropping blanks.
fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

fn push_paging(params: &mut Params, sort_by: &str, offset: u16, limit: u16) {
    if !sort_by.is_empty() {
        params.push(("order", sort_by.to_string()));
    }
    params.push(("offset", offset.to_string()));
    params.push(("limit", limit.to_string()));
}

fn push_course_selector(params: &mut Params, course_codes: &str, prefix: &str) {
    let codes = split_list(course_codes);
    if !codes.is_empty() {
        params.push(("course_code", format!("in.({})", codes.join(","))));
    }
    if !prefix.is_empty() {
        params.push(("course_code", format!("like.{}*", prefix)));
    }
}

/// `SELECT <columns> FROM Courses WHERE ... OFFSET .. LIMIT ..`
pub fn courses_params(args: &CoursesArgs, columns: &[&str]) -> Params {
    let mut params: Params = vec![("select", columns.join(","))];
    push_course_selector(&mut params, &args.course_codes, &args.prefix);
    if !args.number.is_empty() {
        params.push(("course_code", format!("like.*{}", args.number)));
    }

    let gen_eds = split_list(&args.gen_eds);
    if !gen_eds.is_empty() {
        params.push(("gen_eds", format!("cs.{{{}}}", gen_eds.join(","))));
    }
    for condition in &args.credits {
        params.push(("min_credits", condition.clone()));
    }

    push_paging(&mut params, &args.sort_by, args.offset, args.limit);
    params
}

pub fn sections_params(args: &SectionsArgs) -> Params {
    let mut params: Params = vec![("select", "*".to_string())];
    push_course_selector(&mut params, &args.course_codes, &args.prefix);

    for condition in &args.total_class_size {
        params.push(("total_class_size", condition.clone()));
    }
    if args.only_open {
        params.push(("open_seats", "gt.0".to_string()));
    }
    if !args.instructor.is_empty() {
        params.push(("instructors", format!("cs.{{\"{}\"}}", args.instructor)));
    }

    push_paging(&mut params, &args.sort_by, args.offset, args.limit);
    params
}

pub fn instructors_params(args: &InstructorArgs) -> Params {
    let mut params: Params = vec![("select", "*".to_string())];

    let names = split_list(&args.instructor_names);
    if !names.is_empty() {
        let quoted: Vec<String> = names.iter().map(|name| format!("\"{}\"", name)).collect();
        params.push(("name", format!("in.({})", quoted.join(","))));
    }
    let slugs = split_list(&args.instructor_slugs);
    if !slugs.is_empty() {
        params.push(("slug", format!("in.({})", slugs.join(","))));
    }
    for condition in &args.ratings {
        params.push(("average_rating", condition.clone()));
    }

    push_paging(&mut params, &args.sort_by, args.offset, args.limit);
    params
}

pub fn departments_params() -> Params {
    vec![("select", "*".to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<'a>(params: &'a Params, name: &str) -> Vec<&'a str> {
        params
            .iter()
            .filter(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    #[test]
    fn test_courses_by_prefix() {
        let args = CoursesArgs {
            prefix: "CMSC".to_string(),
            limit: 10,
            offset: 20,
            ..Default::default()
        };

        let params = courses_params(&args, &["course_code", "name"]);

        assert_eq!(values(&params, "select"), vec!["course_code,name"]);
        assert_eq!(values(&params, "course_code"), vec!["like.CMSC*"]);
        assert_eq!(values(&params, "offset"), vec!["20"]);
        assert_eq!(values(&params, "limit"), vec!["10"]);
        assert!(values(&params, "order").is_empty());
    }

    #[test]
    fn test_courses_by_codes_gen_eds_and_credits() {
        let args = CoursesArgs {
            course_codes: "CMSC131, MATH140,".to_string(),
            gen_eds: "DSNL,DSSP".to_string(),
            credits: vec!["gte.3".to_string(), "lte.4".to_string()],
            sort_by: "course_code.asc".to_string(),
            limit: 100,
            ..Default::default()
        };

        let params = courses_params(&args, &["*", "sections(*)"]);

        assert_eq!(values(&params, "select"), vec!["*,sections(*)"]);
        assert_eq!(values(&params, "course_code"), vec!["in.(CMSC131,MATH140)"]);
        assert_eq!(values(&params, "gen_eds"), vec!["cs.{DSNL,DSSP}"]);
        assert_eq!(values(&params, "min_credits"), vec!["gte.3", "lte.4"]);
        assert_eq!(values(&params, "order"), vec!["course_code.asc"]);
    }

    #[test]
    fn test_courses_by_number() {
        let args = CoursesArgs {
            number: "131".to_string(),
            limit: 100,
            ..Default::default()
        };
        let params = courses_params(&args, &["*"]);
        assert_eq!(values(&params, "course_code"), vec!["like.*131"]);
    }

    #[test]
    fn test_sections_filters() {
        let args = SectionsArgs {
            prefix: "MATH".to_string(),
            total_class_size: vec!["lt.30".to_string()],
            only_open: true,
            instructor: "Jane Doe".to_string(),
            limit: 100,
            ..Default::default()
        };

        let params = sections_params(&args);

        assert_eq!(values(&params, "course_code"), vec!["like.MATH*"]);
        assert_eq!(values(&params, "total_class_size"), vec!["lt.30"]);
        assert_eq!(values(&params, "open_seats"), vec!["gt.0"]);
        assert_eq!(values(&params, "instructors"), vec!["cs.{\"Jane Doe\"}"]);
    }

    #[test]
    fn test_instructors_filters() {
        let args = InstructorArgs {
            instructor_names: "Jane Doe,John Roe".to_string(),
            ratings: vec!["gt.3.5".to_string()],
            limit: 100,
            ..Default::default()
        };

        let params = instructors_params(&args);

        assert_eq!(values(&params, "name"), vec!["in.(\"Jane Doe\",\"John Roe\")"]);
        assert_eq!(values(&params, "average_rating"), vec!["gt.3.5"]);
        assert!(values(&params, "slug").is_empty());
    }

    #[test]
    fn test_departments_select_all() {
        assert_eq!(departments_params(), vec![("select", "*".to_string())]);
    }
}
