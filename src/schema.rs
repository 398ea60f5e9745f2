// Mirrors CREATE_CAFE_TABLE in services/db_utils.rs.

diesel::table! {
    cafe (id) {
        id -> Integer,
        name -> Text,
        map_url -> Text,
        img_url -> Text,
        location -> Text,
        seats -> Text,
        has_toilet -> Bool,
        has_wifi -> Bool,
        has_sockets -> Bool,
        can_take_calls -> Bool,
        coffee_price -> Nullable<Text>,
    }
}
