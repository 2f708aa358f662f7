//! Accounts, profiles, roles and privileges outside the Oracle-maintained set.

use chrono::NaiveDateTime;
use dbinspect_query::record;
use dbinspect_report::{SubQuery, SubQuerySet, TableRow};

use super::opt;

pub const USERS_SQL: &str = "\
SELECT USERNAME, ACCOUNT_STATUS, LOCK_DATE, EXPIRY_DATE, DEFAULT_TABLESPACE,
       TEMPORARY_TABLESPACE, PROFILE, CREATED, LAST_LOGIN
FROM DBA_USERS
WHERE (ORACLE_MAINTAINED = 'N' OR ORACLE_MAINTAINED IS NULL)
  AND USERNAME NOT IN (
    'ANONYMOUS', 'APEX_PUBLIC_USER', 'AUDSYS', 'CTXSYS', 'DBSFWUSER', 'DBSNMP', 'DIP',
    'DVF', 'DVSYS', 'GGSYS', 'GSMADMIN_INTERNAL', 'GSMCATUSER', 'GSMUSER', 'LBACSYS',
    'MDDATA', 'MDSYS', 'OLAPSYS', 'ORACLE_OCM', 'ORDDATA', 'ORDPLUGINS', 'ORDSYS',
    'OUTLN', 'REMOTE_SCHEDULER_AGENT', 'SI_INFORMTN_SCHEMA', 'SYS$UMF', 'SYSBACKUP',
    'SYSDG', 'SYSKM', 'SYSRAC', 'SYSTEM', 'SYS', 'WMSYS', 'XDB', 'XS$NULL')
ORDER BY USERNAME";

/// Every setting of user profiles, plus the password settings of `DEFAULT`.
pub const PROFILES_SQL: &str = "\
SELECT PROFILE, RESOURCE_NAME, LIMIT
FROM DBA_PROFILES
WHERE PROFILE != 'DEFAULT' OR (PROFILE = 'DEFAULT' AND RESOURCE_TYPE = 'PASSWORD')
ORDER BY PROFILE, RESOURCE_NAME";

pub const ROLES_SQL: &str = "\
SELECT ROLE, AUTHENTICATION_TYPE
FROM DBA_ROLES
WHERE ORACLE_MAINTAINED = 'N' OR ORACLE_MAINTAINED IS NULL
ORDER BY ROLE";

pub const PRIVILEGED_ROLES_SQL: &str = "\
SELECT drp.GRANTEE, drp.GRANTED_ROLE, drp.ADMIN_OPTION, drp.DEFAULT_ROLE
FROM DBA_ROLE_PRIVS drp
JOIN DBA_USERS u ON drp.GRANTEE = u.USERNAME
WHERE (u.ORACLE_MAINTAINED = 'N' OR u.ORACLE_MAINTAINED IS NULL)
  AND drp.GRANTED_ROLE IN ('DBA', 'SYSDBA', 'SYSOPER', 'AQ_ADMINISTRATOR_ROLE', 'SCHEDULER_ADMIN',
    'IMP_FULL_DATABASE', 'EXP_FULL_DATABASE', 'DATAPUMP_IMP_FULL_DATABASE',
    'DATAPUMP_EXP_FULL_DATABASE', 'GATHER_SYSTEM_STATISTICS', 'RECOVERY_CATALOG_OWNER')
ORDER BY drp.GRANTEE, drp.GRANTED_ROLE";

pub const SYSTEM_PRIVILEGES_SQL: &str = "\
SELECT dsp.GRANTEE, dsp.PRIVILEGE, dsp.ADMIN_OPTION
FROM DBA_SYS_PRIVS dsp
JOIN DBA_USERS u ON dsp.GRANTEE = u.USERNAME
WHERE u.ORACLE_MAINTAINED = 'N' OR u.ORACLE_MAINTAINED IS NULL
ORDER BY dsp.GRANTEE, dsp.PRIVILEGE";

pub const ROLE_GRANTS_SQL: &str = "\
SELECT rrp.ROLE, rrp.GRANTED_ROLE, rrp.ADMIN_OPTION
FROM ROLE_ROLE_PRIVS rrp
LEFT JOIN DBA_ROLES dr ON rrp.ROLE = dr.ROLE
WHERE (dr.ORACLE_MAINTAINED = 'N' OR dr.ORACLE_MAINTAINED IS NULL)
  AND rrp.ROLE != rrp.GRANTED_ROLE
ORDER BY rrp.ROLE, rrp.GRANTED_ROLE";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn date(value: &Option<NaiveDateTime>) -> String {
    value
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct User {
        pub username: String,
        pub account_status: String,
        pub lock_date: Option<NaiveDateTime>,
        pub expiry_date: Option<NaiveDateTime>,
        pub default_tablespace: Option<String>,
        pub temporary_tablespace: Option<String>,
        pub profile: Option<String>,
        pub created: Option<NaiveDateTime>,
        pub last_login: Option<NaiveDateTime>,
    }
}

impl TableRow for User {
    fn headers() -> Vec<&'static str> {
        vec![
            "Username", "Status", "Lock Date", "Expiry Date", "Default Tablespace",
            "Temporary Tablespace", "Profile", "Created", "Last Login",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.account_status.clone(),
            date(&self.lock_date),
            date(&self.expiry_date),
            opt(&self.default_tablespace),
            opt(&self.temporary_tablespace),
            opt(&self.profile),
            date(&self.created),
            date(&self.last_login),
        ]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct ProfileLimit {
        pub profile: String,
        pub resource_name: String,
        pub limit: Option<String>,
    }
}

impl TableRow for ProfileLimit {
    fn headers() -> Vec<&'static str> {
        vec!["Profile", "Resource", "Limit"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.profile.clone(), self.resource_name.clone(), opt(&self.limit)]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct Role {
        pub role: String,
        pub authentication_type: Option<String>,
    }
}

impl TableRow for Role {
    fn headers() -> Vec<&'static str> {
        vec!["Role", "Authentication"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.role.clone(), opt(&self.authentication_type)]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct PrivilegedRole {
        pub grantee: String,
        pub granted_role: String,
        pub admin_option: Option<String>,
        pub default_role: Option<String>,
    }
}

impl TableRow for PrivilegedRole {
    fn headers() -> Vec<&'static str> {
        vec!["Grantee", "Granted Role", "Admin Option", "Default Role"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.grantee.clone(),
            self.granted_role.clone(),
            opt(&self.admin_option),
            opt(&self.default_role),
        ]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct SystemPrivilege {
        pub grantee: String,
        pub privilege: String,
        pub admin_option: Option<String>,
    }
}

impl TableRow for SystemPrivilege {
    fn headers() -> Vec<&'static str> {
        vec!["Grantee", "Privilege", "Admin Option"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.grantee.clone(), self.privilege.clone(), opt(&self.admin_option)]
    }
}

record! {
    #[derive(Debug, Default, Clone)]
    pub struct RoleGrant {
        pub role: String,
        pub granted_role: String,
        pub admin_option: Option<String>,
    }
}

impl TableRow for RoleGrant {
    fn headers() -> Vec<&'static str> {
        vec!["Role", "Granted Role", "Admin Option"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.role.clone(), self.granted_role.clone(), opt(&self.admin_option)]
    }
}

pub fn subqueries() -> SubQuerySet {
    SubQuerySet::new(
        "security",
        vec![
            SubQuery::table::<User>("users", "Non-system Users", USERS_SQL),
            SubQuery::table::<ProfileLimit>("profiles", "Profiles", PROFILES_SQL),
            SubQuery::table::<Role>("roles", "Non-system Roles", ROLES_SQL),
            SubQuery::table::<PrivilegedRole>(
                "privileged_roles",
                "Users with Privileged Roles",
                PRIVILEGED_ROLES_SQL,
            ),
            SubQuery::table::<SystemPrivilege>(
                "system_privileges",
                "User System Privileges",
                SYSTEM_PRIVILEGES_SQL,
            ),
            SubQuery::table::<RoleGrant>("role_grants", "Role-to-Role Grants", ROLE_GRANTS_SQL),
        ],
    )
}
