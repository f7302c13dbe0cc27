mod schema;
mod statements;
mod store;

pub use schema::WAREHOUSE_SCHEMA;
pub use statements::{
    count_rows, insert_artist, insert_song, insert_songplay, insert_time, insert_user,
    lookup_song,
};
pub use store::{SqliteWarehouse, TableCounts};
