//! Integration tests for GEDCOM import.

use treesync_core::{DatePrecision, DateQualifier, Gender};
use treesync_gedcom::import_tree;

/// Minimal GEDCOM 5.5.1 with one individual.
const MINIMAL_GEDCOM: &str = "\
0 HEAD
1 GEDC
2 VERS 5.5.1
2 FORM LINEAGE-LINKED
1 CHAR UTF-8
0 @I1@ INDI
1 NAME John Henry /Doe/
2 GIVN John Henry
2 SURN Doe
1 SEX M
1 BIRT
2 DATE 15 JAN 1842
2 PLAC London, England
1 DEAT
2 DATE ABT 1910
2 PLAC Paris, France
0 TRLR
";

/// GEDCOM with two spouses and two children.
const FAMILY_GEDCOM: &str = "\
0 HEAD
1 GEDC
2 VERS 5.5.1
2 FORM LINEAGE-LINKED
1 CHAR UTF-8
0 @I1@ INDI
1 NAME Ivan /Ivanov/
2 GIVN Ivan
2 SURN Ivanov
1 SEX M
1 FAMS @F1@
0 @I2@ INDI
1 NAME Maria /Ivanova/
2 GIVN Maria
2 SURN Ivanova
1 SEX F
1 FAMS @F1@
0 @I3@ INDI
1 NAME Peter /Ivanov/
2 GIVN Peter
2 SURN Ivanov
1 SEX M
1 BIRT
2 DATE 1970
1 FAMC @F1@
0 @I4@ INDI
1 NAME Anna /Ivanova/
2 GIVN Anna
2 SURN Ivanova
1 SEX F
1 BIRT
2 DATE 1972
1 FAMC @F1@
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
1 CHIL @I4@
1 MARR
2 DATE 5 JUN 1965
2 PLAC Moscow, Russia
0 TRLR
";

/// GEDCOM with a dangling child reference.
const DANGLING_GEDCOM: &str = "\
0 HEAD
1 GEDC
2 VERS 5.5.1
0 @I1@ INDI
1 NAME John /Doe/
1 SEX M
0 @F1@ FAM
1 HUSB @I1@
1 CHIL @I99@
0 TRLR
";

/// GEDCOM where the recorded sex contradicts the family role.
const ROLE_CONFLICT_GEDCOM: &str = "\
0 HEAD
1 GEDC
2 VERS 5.5.1
0 @I1@ INDI
1 NAME Sasha /Petrov/
1 SEX F
0 @I2@ INDI
1 NAME Vera /Petrova/
1 SEX F
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
0 TRLR
";

/// GEDCOM with an inline photo object.
const PHOTO_GEDCOM: &str = "\
0 HEAD
1 GEDC
2 VERS 5.5.1
0 @I1@ INDI
1 NAME John /Doe/
1 SEX M
1 OBJE
2 FILE /photos/john_doe.jpg
3 FORM image/jpeg
2 TITL Portrait of John Doe
0 TRLR
";

#[test]
fn test_import_minimal_individual() {
    let loaded = import_tree(MINIMAL_GEDCOM).unwrap();
    assert!(loaded.warnings.is_empty(), "warnings: {:?}", loaded.warnings);
    assert_eq!(loaded.tree.person_count(), 1);

    let p = loaded.tree.person("@I1@").unwrap();
    assert_eq!(p.first_name.as_deref(), Some("John"));
    assert_eq!(p.middle_name.as_deref(), Some("Henry"));
    assert_eq!(p.last_name.as_deref(), Some("Doe"));
    assert_eq!(p.gender, Gender::Male);

    let birth = p.birth_date.as_ref().unwrap();
    assert_eq!(birth.precision, DatePrecision::Day);
    assert_eq!((birth.year, birth.month, birth.day), (1842, Some(1), Some(15)));
    assert_eq!(p.birth_place.as_deref(), Some("London, England"));

    let death = p.death_date.as_ref().unwrap();
    assert_eq!(death.qualifier, DateQualifier::About);
    assert_eq!(death.year, 1910);
    assert_eq!(p.death_place.as_deref(), Some("Paris, France"));
}

#[test]
fn test_import_family_relations() {
    let loaded = import_tree(FAMILY_GEDCOM).unwrap();
    assert!(loaded.warnings.is_empty(), "warnings: {:?}", loaded.warnings);
    assert_eq!(loaded.tree.person_count(), 4);
    assert_eq!(loaded.tree.family_count(), 1);

    let family = loaded.tree.family("@F1@").unwrap();
    assert_eq!(family.husband_id.as_deref(), Some("@I1@"));
    assert_eq!(family.wife_id.as_deref(), Some("@I2@"));
    assert_eq!(family.children_ids, vec!["@I3@", "@I4@"]);
    let marriage = family.marriage_date.as_ref().unwrap();
    assert_eq!(marriage.year, 1965);
    assert_eq!(family.marriage_place.as_deref(), Some("Moscow, Russia"));

    // Derived links.
    let husband = loaded.tree.person("@I1@").unwrap();
    assert!(husband.spouse_ids.contains("@I2@"));
    assert!(husband.children_ids.contains("@I3@"));
    assert!(husband.children_ids.contains("@I4@"));

    let child = loaded.tree.person("@I3@").unwrap();
    assert_eq!(child.father_id.as_deref(), Some("@I1@"));
    assert_eq!(child.mother_id.as_deref(), Some("@I2@"));
    assert!(child.sibling_ids.contains("@I4@"));
    assert!(!child.sibling_ids.contains("@I3@"));

    // Index navigation agrees with the derived links.
    assert_eq!(loaded.tree.families_as_spouse("@I1@").len(), 1);
    assert_eq!(loaded.tree.families_as_child("@I3@").len(), 1);
}

#[test]
fn test_dangling_reference_warns_and_drops() {
    let loaded = import_tree(DANGLING_GEDCOM).unwrap();
    assert_eq!(loaded.warnings.len(), 1);
    assert!(
        loaded.warnings[0].contains("@I99@"),
        "warning: {}",
        loaded.warnings[0]
    );
    let family = loaded.tree.family("@F1@").unwrap();
    assert!(family.children_ids.is_empty());
}

#[test]
fn test_role_gender_conflict_demoted_to_unknown() {
    let loaded = import_tree(ROLE_CONFLICT_GEDCOM).unwrap();
    assert_eq!(loaded.warnings.len(), 1);
    // The husband's contradicting SEX F is demoted; the wife keeps hers.
    assert_eq!(loaded.tree.person("@I1@").unwrap().gender, Gender::Unknown);
    assert_eq!(loaded.tree.person("@I2@").unwrap().gender, Gender::Female);
}

#[test]
fn test_photo_urls_lifted() {
    let loaded = import_tree(PHOTO_GEDCOM).unwrap();
    let p = loaded.tree.person("@I1@").unwrap();
    assert_eq!(p.photo_urls, vec!["/photos/john_doe.jpg".to_string()]);
}

#[test]
fn test_unparseable_input_is_typed_error() {
    assert!(import_tree("this is not gedcom").is_err());
}
