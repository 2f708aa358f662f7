//! Instance and database identity.

use dbinspect_core::models::Card;
use dbinspect_core::QuerySpec;
use dbinspect_query::record;
use dbinspect_report::{CardRow, SubQuery, SubQuerySet};

use super::opt;

pub const INSTANCES_SQL: &str = "\
SELECT instance_number, instance_name, host_name, version,
       TO_CHAR(startup_time, 'YYYY-MM-DD HH24:MI:SS') AS startup_time,
       status, database_status, instance_role, archiver
FROM gv$instance ORDER BY instance_number";

pub const DATABASE_SQL: &str = "\
SELECT dbid, name, TO_CHAR(created, 'YYYY-MM-DD HH24:MI:SS') AS created, log_mode, open_mode, cdb,
       database_role, protection_mode, force_logging, flashback_on, platform_name, db_unique_name,
       (SELECT value FROM nls_database_parameters WHERE parameter = 'NLS_CHARACTERSET') AS character_set,
       (SELECT value FROM nls_database_parameters WHERE parameter = 'NLS_NCHAR_CHARACTERSET') AS national_character_set
FROM v$database";

/// Pre-12c databases have no `CDB` column.
pub const DATABASE_LEGACY_SQL: &str = "\
SELECT dbid, name, TO_CHAR(created, 'YYYY-MM-DD HH24:MI:SS') AS created, log_mode, open_mode, 'NO' AS cdb,
       database_role, protection_mode, force_logging, flashback_on, platform_name, db_unique_name,
       (SELECT value FROM nls_database_parameters WHERE parameter = 'NLS_CHARACTERSET') AS character_set,
       (SELECT value FROM nls_database_parameters WHERE parameter = 'NLS_NCHAR_CHARACTERSET') AS national_character_set
FROM v$database";

record! {
    #[derive(Debug, Default, Clone)]
    pub struct Instance {
        pub instance_number: i64,
        pub instance_name: String,
        pub host_name: Option<String>,
        pub version: Option<String>,
        pub startup_time: Option<String>,
        pub status: Option<String>,
        pub database_status: Option<String>,
        pub instance_role: Option<String>,
        pub archiver: Option<String>,
    }
}

impl CardRow for Instance {
    fn cards(&self) -> Vec<Card> {
        let n = self.instance_number;
        vec![
            Card::new(format!("Instance {n} Name"), self.instance_name.clone()),
            Card::new(format!("Instance {n} Host"), opt(&self.host_name)),
            Card::new(format!("Instance {n} Version"), opt(&self.version)),
            Card::new(format!("Instance {n} Startup Time"), opt(&self.startup_time)),
            Card::new(format!("Instance {n} Status"), opt(&self.status)),
            Card::new(format!("Instance {n} Role"), opt(&self.instance_role)),
            Card::new(format!("Instance {n} Archiver"), opt(&self.archiver)),
        ]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct Database {
        pub dbid: Option<i64>,
        pub name: Option<String>,
        pub created: Option<String>,
        pub log_mode: Option<String>,
        pub open_mode: Option<String>,
        pub cdb: Option<String>,
        pub database_role: Option<String>,
        pub protection_mode: Option<String>,
        pub force_logging: Option<String>,
        pub flashback_on: Option<String>,
        pub platform_name: Option<String>,
        pub db_unique_name: Option<String>,
        pub character_set: Option<String>,
        pub national_character_set: Option<String>,
    }
}

impl CardRow for Database {
    fn cards(&self) -> Vec<Card> {
        vec![
            Card::new("DB Name", opt(&self.name)),
            Card::new("DBID", opt(&self.dbid)),
            Card::new("Created", opt(&self.created)),
            Card::new("Log Mode", opt(&self.log_mode)),
            Card::new("Open Mode", opt(&self.open_mode)),
            Card::new("CDB", opt(&self.cdb)),
            Card::new("Protection Mode", opt(&self.protection_mode)),
            Card::new("Force Logging", opt(&self.force_logging)),
            Card::new("Flashback", opt(&self.flashback_on)),
            Card::new("DB Role", opt(&self.database_role)),
            Card::new("Platform Name", opt(&self.platform_name)),
            Card::new("DB Unique Name", opt(&self.db_unique_name)),
            Card::new("Character Set", opt(&self.character_set)),
            Card::new("National Character Set", opt(&self.national_character_set)),
        ]
    }
}

pub fn subqueries() -> SubQuerySet {
    SubQuerySet::new(
        "dbinfo",
        vec![
            SubQuery::cards::<Instance>("instances", "Instances", INSTANCES_SQL),
            SubQuery::cards::<Database>(
                "database",
                "Database",
                QuerySpec::new(DATABASE_SQL).with_fallback(DATABASE_LEGACY_SQL),
            ),
        ],
    )
}
