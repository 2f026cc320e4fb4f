use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::CatalogCourse;
use crate::workflows::admission::domain::parse_points;

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<CatalogCourse>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut courses = Vec::new();

    for record in csv_reader.deserialize::<CatalogRow>() {
        let row = record?;
        if row.code.is_empty() {
            continue;
        }

        courses.push(CatalogCourse {
            code: row.code,
            name: row.name,
            points: row.points.as_deref().and_then(parse_points),
        });
    }

    Ok(courses)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Points", default, deserialize_with = "empty_string_as_none")]
    points: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
