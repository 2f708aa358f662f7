//! Non-default initialization parameters.

use dbinspect_query::record;
use dbinspect_report::{SubQuery, SubQuerySet, TableRow};

use super::opt;

pub const PARAMETERS_SQL: &str = "SELECT NAME, VALUE FROM V$PARAMETER WHERE ISDEFAULT = 'FALSE' ORDER BY NAME";

record! {
    #[derive(Debug, Default, Clone)]
    pub struct Parameter {
        pub name: String,
        pub value: Option<String>,
    }
}

impl TableRow for Parameter {
    fn headers() -> Vec<&'static str> {
        vec!["Parameter", "Value"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), opt(&self.value)]
    }
}

pub fn subqueries() -> SubQuerySet {
    SubQuerySet::new(
        "parameters",
        vec![SubQuery::table::<Parameter>(
            "non_default",
            "Non-default Parameters",
            PARAMETERS_SQL,
        )],
    )
}
