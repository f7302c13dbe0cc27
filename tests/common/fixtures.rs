use sparkify_etl::{AppConfig, CliConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CASUAL_SONG_ID: &str = "SOMZWCG12A8C13C480";
pub const CASUAL_ARTIST_ID: &str = "ARD7TVE1187B99BFB1";
pub const CASUAL_TITLE: &str = "I Didn't Mean To";
pub const CASUAL_DURATION: f64 = 218.93179;

pub const PAVEMENT_SONG_ID: &str = "SOBAYLL12A8C138AF9";
pub const PAVEMENT_ARTIST_ID: &str = "ARDR4AC1187FB371A1";
pub const PAVEMENT_TITLE: &str = "Mercy:The Laundromat";
pub const PAVEMENT_DURATION: f64 = 99.16036;

/// A temporary directory holding `song_data/`, `log_data/` and the database.
pub struct TestData {
    pub dir: TempDir,
}

impl TestData {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("song_data")).unwrap();
        fs::create_dir_all(dir.path().join("log_data")).unwrap();
        TestData { dir }
    }

    pub fn song_data(&self) -> PathBuf {
        self.dir.path().join("song_data")
    }

    pub fn log_data(&self) -> PathBuf {
        self.dir.path().join("log_data")
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("sparkify.db")
    }

    pub fn config(&self) -> AppConfig {
        let cli = CliConfig {
            db_path: self.db_path(),
            song_data: self.song_data(),
            log_data: self.log_data(),
            init_schema: true,
            ..Default::default()
        };
        AppConfig::resolve(&cli, None).unwrap()
    }

    /// Writes `content` at `relative` under the song data root.
    pub fn write_song_file(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.song_data(), relative, content)
    }

    /// Writes the given lines at `relative` under the log data root.
    pub fn write_log_file(&self, relative: &str, lines: &[String]) -> PathBuf {
        write_file(&self.log_data(), relative, &lines.join("\n"))
    }

    /// Casual and Pavement song files, nested the way the dataset nests them.
    pub fn write_catalog(&self) {
        self.write_song_file(
            "A/A/A/TRAAAAW128F429D538.json",
            &song_json(CASUAL_SONG_ID, CASUAL_TITLE, CASUAL_ARTIST_ID, "Casual", CASUAL_DURATION),
        );
        self.write_song_file(
            "A/B/C/TRABCEI128F424C983.json",
            &song_json(
                PAVEMENT_SONG_ID,
                PAVEMENT_TITLE,
                PAVEMENT_ARTIST_ID,
                "Pavement",
                PAVEMENT_DURATION,
            ),
        );
    }
}

fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

pub fn song_json(song_id: &str, title: &str, artist_id: &str, artist_name: &str, duration: f64) -> String {
    serde_json::json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": artist_name,
        "song_id": song_id,
        "title": title,
        "duration": duration,
        "year": 1999
    })
    .to_string()
}

pub struct LogEvent<'a> {
    pub page: &'a str,
    pub ts: i64,
    pub user_id: &'a str,
    pub level: &'a str,
    pub song: &'a str,
    pub artist: &'a str,
    pub length: f64,
}

impl Default for LogEvent<'_> {
    fn default() -> Self {
        LogEvent {
            page: "NextSong",
            ts: 1541121934796,
            user_id: "10",
            level: "free",
            song: PAVEMENT_TITLE,
            artist: "Pavement",
            length: PAVEMENT_DURATION,
        }
    }
}

impl LogEvent<'_> {
    pub fn to_line(&self) -> String {
        serde_json::json!({
            "artist": self.artist,
            "auth": "Logged In",
            "firstName": "Sylvie",
            "gender": "F",
            "itemInSession": 0,
            "lastName": "Cruz",
            "length": self.length,
            "level": self.level,
            "location": "Washington-Arlington-Alexandria, DC-VA-MD-WV",
            "method": "PUT",
            "page": self.page,
            "registration": 1540266185796.0,
            "sessionId": 345,
            "song": self.song,
            "status": 200,
            "ts": self.ts,
            "userAgent": "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_4)",
            "userId": self.user_id
        })
        .to_string()
    }
}
