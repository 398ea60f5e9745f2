use actix_multipart::form::text::Text;
use actix_multipart::form::MultipartForm;
use diesel::result::{DatabaseErrorKind, Error};
use diesel::{AsChangeset, Insertable, QueryResult};
use serde::{Deserialize, Serialize};

use crate::schema::cafe;

/// Raw form fields as submitted to `/add` and `/update-cafe/{id}`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct CafeForm {
    pub name: Option<String>,
    pub map_url: Option<String>,
    pub img_url: Option<String>,
    pub location: Option<String>,
    pub seats: Option<String>,
    pub coffee_price: Option<String>,
    pub has_sockets: Option<String>,
    pub has_toilet: Option<String>,
    pub has_wifi: Option<String>,
    pub can_take_calls: Option<String>,
}

impl CafeForm {
    /// Builds a form from ordered key/value pairs. The first value of a
    /// repeated key wins, unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = CafeForm::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut form.name,
                "map_url" => &mut form.map_url,
                "img_url" => &mut form.img_url,
                "location" => &mut form.location,
                "seats" => &mut form.seats,
                "coffee_price" => &mut form.coffee_price,
                "has_sockets" => &mut form.has_sockets,
                "has_toilet" => &mut form.has_toilet,
                "has_wifi" => &mut form.has_wifi,
                "can_take_calls" => &mut form.can_take_calls,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        form
    }
}

/// The same fields sent as `multipart/form-data`. Repeated parts keep the first value.
#[derive(MultipartForm, Debug)]
pub struct CafeMultipart {
    pub name: Option<Text<String>>,
    pub map_url: Option<Text<String>>,
    pub img_url: Option<Text<String>>,
    pub location: Option<Text<String>>,
    pub seats: Option<Text<String>>,
    pub coffee_price: Option<Text<String>>,
    pub has_sockets: Option<Text<String>>,
    pub has_toilet: Option<Text<String>>,
    pub has_wifi: Option<Text<String>>,
    pub can_take_calls: Option<Text<String>>,
}

impl From<CafeMultipart> for CafeForm {
    fn from(parts: CafeMultipart) -> Self {
        let text = |field: Option<Text<String>>| field.map(Text::into_inner);

        CafeForm {
            name: text(parts.name),
            map_url: text(parts.map_url),
            img_url: text(parts.img_url),
            location: text(parts.location),
            seats: text(parts.seats),
            coffee_price: text(parts.coffee_price),
            has_sockets: text(parts.has_sockets),
            has_toilet: text(parts.has_toilet),
            has_wifi: text(parts.has_wifi),
            can_take_calls: text(parts.can_take_calls),
        }
    }
}

/// A full row minus the id. Used both for inserts and for whole-row updates,
/// so a missing `coffee_price` is written as NULL in either case.
#[derive(Insertable, AsChangeset, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = cafe, treat_none_as_null = true)]
pub struct CafeChanges {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    pub coffee_price: Option<String>,
}

/// Any non-empty value counts as true, "false" and "0" included.
pub fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn required(column: &str, value: Option<String>) -> QueryResult<String> {
    value.ok_or_else(|| {
        Error::DatabaseError(
            DatabaseErrorKind::NotNullViolation,
            Box::new(format!("NOT NULL constraint failed: cafe.{column}")),
        )
    })
}

impl TryFrom<CafeForm> for CafeChanges {
    type Error = Error;

    fn try_from(form: CafeForm) -> QueryResult<Self> {
        Ok(CafeChanges {
            has_toilet: is_present(&form.has_toilet),
            has_wifi: is_present(&form.has_wifi),
            has_sockets: is_present(&form.has_sockets),
            can_take_calls: is_present(&form.can_take_calls),
            name: required("name", form.name)?,
            map_url: required("map_url", form.map_url)?,
            img_url: required("img_url", form.img_url)?,
            location: required("location", form.location)?,
            seats: required("seats", form.seats)?,
            coffee_price: form.coffee_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn costa() -> CafeForm {
        CafeForm {
            name: Some("Costa".into()),
            map_url: Some("http://x".into()),
            img_url: Some("http://y".into()),
            location: Some("London".into()),
            seats: Some("20".into()),
            coffee_price: Some("£2.50".into()),
            has_wifi: Some("true".into()),
            ..CafeForm::default()
        }
    }

    #[test]
    fn booleans_follow_presence_not_value() {
        assert!(is_present(&Some("true".into())));
        assert!(is_present(&Some("false".into())));
        assert!(is_present(&Some("0".into())));
        assert!(is_present(&Some("no".into())));
        assert!(!is_present(&Some(String::new())));
        assert!(!is_present(&None));
    }

    #[test]
    fn form_converts_to_full_row() {
        let changes = CafeChanges::try_from(costa()).unwrap();

        assert_eq!(changes.name, "Costa");
        assert_eq!(changes.coffee_price.as_deref(), Some("£2.50"));
        assert!(changes.has_wifi);
        assert!(!changes.has_toilet);
        assert!(!changes.has_sockets);
        assert!(!changes.can_take_calls);
    }

    #[test]
    fn literal_false_still_sets_flag() {
        let form = CafeForm {
            has_toilet: Some("false".into()),
            ..costa()
        };

        assert!(CafeChanges::try_from(form).unwrap().has_toilet);
    }

    #[test]
    fn missing_required_field_is_a_not_null_violation() {
        let form = CafeForm {
            seats: None,
            ..costa()
        };

        match CafeChanges::try_from(form) {
            Err(Error::DatabaseError(DatabaseErrorKind::NotNullViolation, info)) => {
                assert!(info.message().contains("cafe.seats"));
            }
            other => panic!("expected not-null violation, got {other:?}"),
        }
    }

    #[test]
    fn pairs_keep_first_value_and_skip_unknown_keys() {
        let form = CafeForm::from_pairs([
            ("name".to_owned(), "D".to_owned()),
            ("name".to_owned(), "E".to_owned()),
            ("has_wifi".to_owned(), String::new()),
            ("has_wifi".to_owned(), "1".to_owned()),
            ("colour".to_owned(), "red".to_owned()),
        ]);

        assert_eq!(form.name.as_deref(), Some("D"));
        assert_eq!(form.has_wifi.as_deref(), Some(""));
        assert!(!is_present(&form.has_wifi));
        assert_eq!(form.location, None);
    }

    #[test]
    fn missing_price_is_allowed() {
        let form = CafeForm {
            coffee_price: None,
            ..costa()
        };

        assert_eq!(CafeChanges::try_from(form).unwrap().coffee_price, None);
    }
}
