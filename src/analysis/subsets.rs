//! Row subsets shared by the objectives.

use crate::config::Config;
use crate::error::TableError;
use crate::table::{Predicate, Table};
use tracing::debug;

/// State-level, all-ages, total-area rows: one row per state.
pub fn state_totals(table: &Table, config: &Config) -> Result<Table, TableError> {
    let cols = &config.columns;
    let filters = &config.filters;
    let subset = table.filter(&[
        Predicate::equals(&cols.district_code, filters.state_level_district_code),
        Predicate::equals(&cols.age_group, filters.all_ages_label.as_str()),
        Predicate::equals(&cols.area_type, filters.total_label.as_str()),
    ])?;
    debug!("State totals subset: {} rows", subset.len());
    Ok(subset)
}

/// State-level, total-area rows broken down by age group.
pub fn age_breakdown(table: &Table, config: &Config) -> Result<Table, TableError> {
    let cols = &config.columns;
    let filters = &config.filters;
    let subset = table.filter(&[
        Predicate::equals(&cols.district_code, filters.state_level_district_code),
        Predicate::equals(&cols.area_type, filters.total_label.as_str()),
        Predicate::not_in(&cols.age_group, vec![filters.all_ages_label.as_str()]),
    ])?;
    debug!("Age breakdown subset: {} rows", subset.len());
    Ok(subset)
}

/// All-ages rows of one area type, across every district level.
pub fn area_all_ages(table: &Table, config: &Config, area_label: &str) -> Result<Table, TableError> {
    let cols = &config.columns;
    let subset = table.filter(&[
        Predicate::equals(&cols.area_type, area_label),
        Predicate::equals(&cols.age_group, config.filters.all_ages_label.as_str()),
    ])?;
    debug!("{} all-ages subset: {} rows", area_label, subset.len());
    Ok(subset)
}

/// State codes appearing more than once, in first-seen order.
pub fn duplicate_states(states: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut dups = Vec::new();
    for state in states {
        if !seen.insert(state) && !dups.contains(state) {
            dups.push(state.clone());
        }
    }
    dups
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::table::cell::Cell;
    use crate::table::Table;

    pub const COLUMNS: [&str; 17] = [
        "State_Code",
        "Distt_Code",
        "Area_Name",
        "Total_or_Rural_or_Urban",
        "Age_group",
        "Total_Persons",
        "Total_Males",
        "Total_Females",
        "Total_Workers",
        "Male_Workers",
        "Female_Workers",
        "Main_Workers",
        "Marginal_Workers",
        "Cultivators",
        "Agricultural_Labourers",
        "Household_Industry_Workers",
        "Other_Workers",
    ];

    /// One census row; the worker-type split is derived from `workers`.
    #[allow(clippy::too_many_arguments)]
    pub fn row(
        state: f64,
        district: f64,
        area: &str,
        age: &str,
        persons: f64,
        males: f64,
        workers: f64,
        male_workers: f64,
        main: f64,
    ) -> Vec<Cell> {
        let cultivators = (workers * (0.2 + state / 50.0)).round();
        let labourers = (workers * (0.3 - state / 80.0)).round();
        let household = (workers * 0.05 + state).round();
        vec![
            Cell::Number(state),
            Cell::Number(district),
            Cell::from(format!("STATE {:02}", state).as_str()),
            Cell::from(area),
            Cell::from(age),
            Cell::Number(persons),
            Cell::Number(males),
            Cell::Number(persons - males),
            Cell::Number(workers),
            Cell::Number(male_workers),
            Cell::Number(workers - male_workers),
            Cell::Number(main),
            Cell::Number(workers - main),
            Cell::Number(cultivators),
            Cell::Number(labourers),
            Cell::Number(household),
            Cell::Number(workers - cultivators - labourers - household),
        ]
    }

    /// Five states with total/rural/urban rows at all ages and two age
    /// bands, plus one district-level row that must be excluded from
    /// state-level subsets.
    pub fn census_table() -> Table {
        let mut rows = Vec::new();
        for s in 1..=5 {
            let st = s as f64;
            let persons = 1000.0 * st + 500.0;
            let males = (persons * (0.50 + st / 100.0)).round();
            let workers = (persons * (0.30 + st / 40.0)).round();
            let male_workers = (workers * (0.62 + st / 200.0)).round();
            let main = (workers * 0.8).round();
            rows.push(row(st, 0.0, "Total", "All ages", persons, males, workers, male_workers, main));

            let r_persons = (persons * 0.7).round();
            let r_workers = (workers * 0.75).round();
            let r_main = (r_workers * 0.7).round();
            rows.push(row(
                st,
                0.0,
                "Rural",
                "All ages",
                r_persons,
                (r_persons * 0.5).round(),
                r_workers,
                (r_workers * 0.6).round(),
                r_main,
            ));
            let u_persons = persons - r_persons;
            let u_workers = workers - r_workers;
            let u_main = (u_workers * 0.9).round();
            rows.push(row(
                st,
                0.0,
                "Urban",
                "All ages",
                u_persons,
                (u_persons * 0.5).round(),
                u_workers,
                (u_workers * 0.6).round(),
                u_main,
            ));

            for (age, share) in [("15-19", 0.15), ("20-24", 0.25)] {
                let a_persons = (persons * share).round();
                let a_workers = (workers * share * (1.0 + st / 20.0)).round();
                let a_main = (a_workers * 0.6).round();
                rows.push(row(
                    st,
                    0.0,
                    "Total",
                    age,
                    a_persons,
                    (a_persons * 0.5).round(),
                    a_workers,
                    (a_workers * 0.6).round(),
                    a_main,
                ));
            }
        }
        rows.push(row(1.0, 7.0, "Total", "All ages", 300.0, 150.0, 120.0, 70.0, 90.0));

        let columns = COLUMNS.iter().map(|c| c.to_string()).collect();
        Table::new(columns, rows).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::cell::Cell;

    #[test]
    fn test_state_totals_one_row_per_state() {
        let table = fixtures::census_table();
        let config = Config::default();

        let states = state_totals(&table, &config).unwrap();
        assert_eq!(states.len(), 5);

        let codes = states.text("State_Code").unwrap();
        assert!(duplicate_states(&codes).is_empty());
        assert!(states
            .cells("Distt_Code")
            .unwrap()
            .iter()
            .all(|c| c.matches(&Cell::Number(0.0))));
    }

    #[test]
    fn test_age_breakdown_excludes_all_ages() {
        let table = fixtures::census_table();
        let ages = age_breakdown(&table, &Config::default()).unwrap();
        assert_eq!(ages.len(), 10);
        assert!(ages
            .text("Age_group")
            .unwrap()
            .iter()
            .all(|a| a != "All ages"));
    }

    #[test]
    fn test_area_subsets() {
        let table = fixtures::census_table();
        let config = Config::default();
        assert_eq!(area_all_ages(&table, &config, "Rural").unwrap().len(), 5);
        assert_eq!(area_all_ages(&table, &config, "Urban").unwrap().len(), 5);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let table = fixtures::census_table();
        let mut config = Config::default();
        config.columns.district_code = "District".to_string();
        assert!(state_totals(&table, &config).is_err());
    }

    #[test]
    fn test_duplicate_states() {
        let states: Vec<String> = ["1", "2", "1", "3", "1", "2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(duplicate_states(&states), vec!["1", "2"]);
    }
}
