//! Calendar-date wire format (`YYYY-MM-DD`) shared by every resource.

use time::{format_description::FormatItem, macros::format_description, Date};

pub const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), ISO_DATE).ok()
}

pub fn format_date(date: Date) -> String {
    // ISO_DATE only has date components, formatting a Date cannot fail.
    date.format(ISO_DATE).unwrap_or_default()
}

/// `#[serde(with = "crate::dates::iso_date")]`
pub mod iso_date {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date {raw:?}")))
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Date;

        pub fn serialize<S: Serializer>(date: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => super::serialize(d, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Date>, D::Error> {
            #[derive(Deserialize)]
            struct Wrap(#[serde(with = "super")] Date);
            Ok(Option::<Wrap>::deserialize(d)?.map(|Wrap(date)| date))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_and_formats_iso_dates() {
        assert_eq!(parse_date("2024-01-10"), Some(date!(2024 - 01 - 10)));
        assert_eq!(parse_date(" 2024-01-10 "), Some(date!(2024 - 01 - 10)));
        assert_eq!(format_date(date!(2024 - 03 - 05)), "2024-03-05");
    }

    #[test]
    fn rejects_non_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("10/01/2024"), None);
    }

    #[test]
    fn serde_roundtrip_for_optional_date() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct T {
            #[serde(with = "iso_date::option", default)]
            d: Option<Date>,
        }
        let json = serde_json::to_string(&T { d: Some(date!(2024 - 06 - 01)) }).unwrap();
        assert_eq!(json, r#"{"d":"2024-06-01"}"#);
        let back: T = serde_json::from_str(r#"{"d":null}"#).unwrap();
        assert_eq!(back, T { d: None });
        let missing: T = serde_json::from_str("{}").unwrap();
        assert_eq!(missing, T { d: None });
    }
}
