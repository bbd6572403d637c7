#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use rusqlite::Connection;

/// Create a SQLite database at `path` by running `sql`.
pub fn create_db(path: &Path, sql: &str) -> PathBuf {
    let conn = Connection::open(path).expect("Failed to create database");
    conn.execute_batch(sql).expect("Failed to initialize database");
    path.to_path_buf()
}

/// `runs` with 3 rows and `events` with 10 rows.
pub fn create_scenario_db(path: &Path) -> PathBuf {
    let mut sql = String::from(
        r#"
        CREATE TABLE runs (
            id INTEGER PRIMARY KEY,
            created_at TEXT NOT NULL,
            "Command" TEXT,
            "exit.Code" INTEGER
        );
        CREATE TABLE events (
            id INTEGER PRIMARY KEY,
            run_id INTEGER NOT NULL REFERENCES runs(id),
            "cpuUsage" REAL,
            payload BLOB
        );
        INSERT INTO runs VALUES (1, '2020-01-01 10:00:00', 'uptime', 0);
        INSERT INTO runs VALUES (2, '2020-01-01 10:01:00', 'vmstat', 0);
        INSERT INTO runs VALUES (3, '2020-01-01 10:02:00', 'iostat', NULL);
        "#,
    );
    for i in 1..=10 {
        sql.push_str(&format!(
            "INSERT INTO events VALUES ({i}, {}, {}, NULL);\n",
            (i % 3) + 1,
            i as f64 * 0.5
        ));
    }
    create_db(path, &sql)
}

/// Builds gzip tar archives member by member. Names are written into the
/// header verbatim so hostile paths can be produced.
pub struct ArchiveBuilder {
    builder: tar::Builder<GzEncoder<File>>,
}

impl ArchiveBuilder {
    pub fn create(path: &Path) -> Self {
        let file = File::create(path).expect("Failed to create archive");
        Self {
            builder: tar::Builder::new(GzEncoder::new(file, Compression::default())),
        }
    }

    pub fn dir(mut self, name: &str) -> Self {
        self.append(name, tar::EntryType::Directory, 0o755, &[]);
        self
    }

    pub fn file(mut self, name: &str, data: &[u8]) -> Self {
        self.append(name, tar::EntryType::Regular, 0o644, data);
        self
    }

    pub fn symlink(mut self, name: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_mode(0o777);
        header.set_size(0);
        header.as_old_mut().name[..name.len()].copy_from_slice(name.as_bytes());
        header
            .set_link_name(target)
            .expect("Failed to set link name");
        header.set_cksum();
        self.builder
            .append(&header, &[][..])
            .expect("Failed to append link");
        self
    }

    pub fn file_from(self, name: &str, source: &Path) -> Self {
        let data = fs::read(source).expect("Failed to read member source");
        self.file(name, &data)
    }

    pub fn finish(self) {
        self.builder
            .into_inner()
            .and_then(|encoder| encoder.finish())
            .and_then(|mut file| file.flush())
            .expect("Failed to finish archive");
    }

    fn append(&mut self, name: &str, kind: tar::EntryType, mode: u32, data: &[u8]) {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(kind);
        header.set_mode(mode);
        header.set_size(data.len() as u64);
        header.as_old_mut().name[..name.len()].copy_from_slice(name.as_bytes());
        header.set_cksum();
        self.builder
            .append(&header, data)
            .expect("Failed to append member");
    }
}

/// `good.tar.gz`: `repeat-42/collections.db` with the scenario tables.
pub fn good_archive(dir: &Path) -> PathBuf {
    let db = create_scenario_db(&dir.join("source.db"));
    let archive = dir.join("good.tar.gz");
    ArchiveBuilder::create(&archive)
        .dir("repeat-42/")
        .file_from("repeat-42/collections.db", &db)
        .file("repeat-42/collector.log", b"collection finished\n")
        .finish();
    archive
}

/// Names of the entries directly inside `dir`.
pub fn entries_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
