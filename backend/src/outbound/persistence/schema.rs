//! Diesel table definitions for the catalogue schema.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    /// Band catalogue. `position` preserves insertion order.
    bands (id) {
        id -> Uuid,
        position -> Int8,
        name -> Text,
        year -> Int4,
        genre -> Text,
        description -> Text,
        image -> Text,
        link -> Text,
        likes -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One liked-band set per user.
    likes (user_id) {
        user_id -> Uuid,
        bands -> Array<Text>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Public user profiles. Credentials live with the identity provider.
    users (id) {
        id -> Uuid,
        username -> Text,
        email -> Text,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(bands, likes, users);
