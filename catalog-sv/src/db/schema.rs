table! {
    genres (id) {
        id -> Int4,
        name -> Text,
    }
}

table! {
    languages (id) {
        id -> Int4,
        name -> Text,
    }
}

table! {
    movies (id) {
        id -> Int4,
        title -> Text,
        genre_id -> Int4,
        language_id -> Int4,
        oscar_count -> Int4,
        release_date -> Date,
    }
}

joinable!(movies -> genres (genre_id));
joinable!(movies -> languages (language_id));

allow_tables_to_appear_in_same_query!(
    genres,
    languages,
    movies,
);
