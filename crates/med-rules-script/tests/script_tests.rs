//! Script-level extraction over a trimmed-down Table 1 script.

use med_rules::{MatchMethod, RuleError};
use med_rules_script::{MedicationScript, ScriptConfig, ScriptError};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const TABLE1_SQL: &str = "/* People with at least one ordered medications specific to Diabetes Mellitus */
insert into SulfonylureaByRXNORM_initial
select a.PATID, a.RX_ORDER_DATE as MedDate
from PRESCRIBING a join ENCOUNTER e on a.ENCOUNTERID = e.ENCOUNTERID
where a.RXNORM_CUI in (3842,153843,153844)
  and e.ENC_TYPE in ('IP', 'EI', 'AV');

insert into SulfonylureaByNames_initial
select a.PATID, a.RX_ORDER_DATE as MedDate
from PRESCRIBING a join ENCOUNTER e on a.ENCOUNTERID = e.ENCOUNTERID
where (regexp_like(a.RAW_RX_MED_NAME, 'Acetohexamide','i') or
       regexp_like(a.RAW_RX_MED_NAME, 'D[i|y]melor','i'))
  and e.ENC_TYPE in ('IP', 'EI', 'AV');

/* People with at least one ordered medications non-specific to Diabetes Mellitus */
insert into BiguanideByNames_initial
select a.PATID, a.RX_ORDER_DATE as MedDate
from PRESCRIBING a join ENCOUNTER e on a.ENCOUNTERID = e.ENCOUNTERID
where (regexp_like(a.RAW_RX_MED_NAME,'Glucophage','i') or
       (regexp_like(a.RAW_RX_MED_NAME,'Metformin','i') and not (
          regexp_like(a.RAW_RX_MED_NAME,'Kazano','i') or
          /* canagliflozin-metformin : */
          regexp_like(a.RAW_RX_MED_NAME,'Invokamet','i')
          )
       ))
  and e.ENC_TYPE in ('IP', 'EI', 'AV');

insert into GLP1AexByRXNORM_initial
select a.PATID, a.RX_ORDER_DATE as MedDate
from PRESCRIBING a join ENCOUNTER e on a.ENCOUNTERID = e.ENCOUNTERID
where a.RXNORM_CUI in (1727493, 1804447, 1804505)
  and e.ENC_TYPE in ('IP', 'EI', 'AV');

insert into FinalStatsTable1
select count(*) from SulfonylureaByNames_initial;
";

mod med_info {
    use super::*;

    #[test]
    fn test_inserts_and_groups() {
        init_logging();
        let script = MedicationScript::new(TABLE1_SQL);
        let inserts: Vec<(&str, Option<i32>)> = script
            .med_inserts()
            .unwrap()
            .iter()
            .map(|insert| (insert.destination, insert.group_id))
            .collect();
        assert_eq!(
            inserts,
            vec![
                ("SulfonylureaByRXNORM_initial", Some(1)),
                ("SulfonylureaByNames_initial", Some(1)),
                ("BiguanideByNames_initial", Some(0)),
                ("GLP1AexByRXNORM_initial", Some(0)),
            ]
        );
    }

    #[test]
    fn test_all_records_in_script_order() {
        init_logging();
        let records = MedicationScript::new(TABLE1_SQL).med_info().unwrap();
        assert_eq!(records.len(), 11);

        let codes: Vec<u64> = records.iter().filter_map(|r| r.code).collect();
        assert_eq!(codes, vec![3842, 153843, 153844, 1727493, 1804447, 1804505]);

        let names: Vec<(&str, &str, Option<&str>)> = records
            .iter()
            .filter(|r| r.match_method == MatchMethod::ByName)
            .map(|r| {
                (
                    r.drug_name.as_str(),
                    r.pattern.as_deref().unwrap_or(""),
                    r.exclusion_pattern.as_deref(),
                )
            })
            .collect();
        assert_eq!(
            names,
            vec![
                ("Sulfonylurea", "Acetohexamide", None),
                ("Sulfonylurea", "D[i|y]melor", None),
                ("Biguanide", "Glucophage", None),
                ("Biguanide", "Metformin", Some("Kazano")),
                ("Biguanide", "Metformin", Some("Invokamet")),
            ]
        );
        assert_eq!(
            records[7].note.as_deref(),
            Some("canagliflozin-metformin")
        );
        assert_eq!(records[10].drug_name, "GLP1Aex");
        assert_eq!(records[10].group_id, Some(0));
    }

    #[test]
    fn test_crlf_line_endings() {
        let crlf = TABLE1_SQL.replace('\n', "\r\n");
        let records = MedicationScript::new(&crlf).med_info().unwrap();
        let lf = MedicationScript::new(TABLE1_SQL).med_info().unwrap();
        assert_eq!(records, lf);
    }

    #[test]
    fn test_insert_without_encounter_filter() {
        let sql = "insert into BiguanideByNames_initial
select * from PRESCRIBING a
where (regexp_like(a.RAW_RX_MED_NAME,'Glucophage','i') or regexp_like(a.RAW_RX_MED_NAME,'Riomet','i'));
";
        let records = MedicationScript::new(sql).med_info().unwrap();
        let patterns: Vec<&str> = records.iter().filter_map(|r| r.pattern.as_deref()).collect();
        assert_eq!(patterns, vec!["Glucophage", "Riomet"]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let config = ScriptConfig::builder().with_parallel(true).build();
        let parallel = MedicationScript::with_config(TABLE1_SQL, config).med_info().unwrap();
        let sequential = MedicationScript::new(TABLE1_SQL).med_info().unwrap();
        assert_eq!(parallel, sequential);
    }
}

mod failures {
    use super::*;

    fn broken_script() -> String {
        TABLE1_SQL.replace("'Glucophage','i') or", "'Glucophage','i') or or")
    }

    #[test]
    fn test_failing_insert_names_destination() {
        let sql = broken_script();
        let err = MedicationScript::new(&sql).med_info().unwrap_err();
        assert!(matches!(
            err,
            ScriptError::Rule { ref destination, source: RuleError::Syntax { .. } }
                if destination == "BiguanideByNames_initial"
        ));
        assert!(err.to_string().starts_with("BiguanideByNames_initial: "));
    }

    #[test]
    fn test_other_inserts_still_extract() {
        let sql = broken_script();
        let results = MedicationScript::new(&sql).extract_each().unwrap();
        let counts: Vec<Option<usize>> = results
            .iter()
            .map(|(_, records)| records.as_ref().ok().map(Vec::len))
            .collect();
        assert_eq!(counts, vec![Some(3), Some(2), None, Some(3)]);
    }

    #[test]
    fn test_unknown_destination_tag() {
        let sql = TABLE1_SQL.replace("GLP1AexByRXNORM_initial", "GLP1AexByNDC_initial");
        assert_eq!(
            MedicationScript::new(&sql).med_info().unwrap_err(),
            ScriptError::UnknownMatchTag {
                destination: "GLP1AexByNDC_initial".to_string(),
                tag: "NDC".to_string(),
            }
        );
    }

    #[test]
    fn test_code_list_under_name_destination() {
        let sql = TABLE1_SQL.replace("GLP1AexByRXNORM_initial", "GLP1AexByNames_initial");
        let err = MedicationScript::new(&sql).med_info().unwrap_err();
        assert!(matches!(
            err,
            ScriptError::Rule { source: RuleError::MatchMethod { .. }, .. }
        ));
    }
}

mod labs {
    use super::*;

    const GLUCOSE_SQL: &str = "with loinc_concepts as (
  select * from lab_result_cm
)
, loinc_fasting_glucose as (
  select 1 fasting, l.* from loinc_concepts l
  where l.LAB_LOINC in ('1558-6', '1493-6', '10450-5')
)
, loinc_random_glucose as (
  select 0 fasting, l.* from loinc_concepts l
  where l.LAB_LOINC in ('2345-7','2339-0')
)
select * from loinc_fasting_glucose;
";

    #[test]
    fn test_lab_code_lists() {
        let lists = MedicationScript::new(GLUCOSE_SQL).lab_code_lists().unwrap();
        let aliases: Vec<&str> = lists.keys().map(String::as_str).collect();
        assert_eq!(aliases, vec!["loinc_fasting_glucose", "loinc_random_glucose"]);
        assert!(lists["loinc_fasting_glucose"].contains("10450-5"));
        assert_eq!(lists["loinc_random_glucose"].len(), 2);
    }

    #[test]
    fn test_custom_lab_marker() {
        let sql = GLUCOSE_SQL.replace("l.LAB_LOINC", "l.RAW_LAB_CODE");
        let config = ScriptConfig::builder()
            .with_lab_marker("where l.RAW_LAB_CODE in")
            .build();
        let lists = MedicationScript::with_config(&sql, config).lab_code_lists().unwrap();
        assert_eq!(lists.len(), 2);
        assert!(MedicationScript::new(&sql).lab_code_lists().unwrap().is_empty());
    }
}
