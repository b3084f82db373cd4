//! Store schema
//!
//! Deleting a session cascades to its teams, participation and analysis
//! rows. Drivers are shared across sessions and survive.

pub(crate) const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS Event (
        event_id    INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        year        INTEGER NOT NULL,
        UNIQUE(name, year)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Session (
        session_id  INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
        event_id    INTEGER NOT NULL,
        name        TEXT NOT NULL,
        session_key INTEGER,
        UNIQUE(event_id, name),
        FOREIGN KEY (event_id) REFERENCES Event(event_id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Team (
        team_id     INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id  INTEGER NOT NULL,
        name        TEXT NOT NULL,
        UNIQUE(session_id, name),
        FOREIGN KEY (session_id) REFERENCES Session(session_id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Driver (
        driver_id   INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL UNIQUE,
        number      INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS DriverSessionParticipation (
        session_driver_id   INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id          INTEGER NOT NULL,
        driver_id           INTEGER NOT NULL,
        team_id             INTEGER NOT NULL,
        number              INTEGER,
        UNIQUE(session_id, driver_id),
        FOREIGN KEY (session_id) REFERENCES Session(session_id) ON DELETE CASCADE,
        FOREIGN KEY (driver_id) REFERENCES Driver(driver_id) ON DELETE CASCADE,
        FOREIGN KEY (team_id) REFERENCES Team(team_id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS Analysis (
        analysis_id         INTEGER PRIMARY KEY AUTOINCREMENT,
        session_driver_id   INTEGER NOT NULL UNIQUE,
        fastest_soft_time   REAL,
        avg_med_time        REAL,
        avg_hard_time       REAL,
        best_avg_compound   TEXT,
        FOREIGN KEY (session_driver_id)
            REFERENCES DriverSessionParticipation(session_driver_id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_session_event ON Session(event_id)",
    "CREATE INDEX IF NOT EXISTS idx_team_session ON Team(session_id)",
    "CREATE INDEX IF NOT EXISTS idx_driver_session ON DriverSessionParticipation(session_id, driver_id)",
];
