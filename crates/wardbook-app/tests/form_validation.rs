use chrono::NaiveDate;
use wardbook_app::{today, PatientForm};
use wardbook_model::{Gender, PatientStatus};

fn complete_form() -> PatientForm {
    PatientForm {
        name: "Ahmed Khan".to_string(),
        age: "28".to_string(),
        gender: "Male".to_string(),
        cnic: "36925-8147036-9".to_string(),
        phone_number: "+92-333-5555555".to_string(),
        email: "ahmed.khan@example.com".to_string(),
        address: String::new(),
        disease: "Acute Appendicitis".to_string(),
        disease_description: String::new(),
        visit_date: "2023-10-18".to_string(),
        status: "Discharged".to_string(),
        doctor_notes: "Recovery progressing well.".to_string(),
    }
}

#[test]
fn a_complete_form_maps_to_the_insert_shape() {
    let record = complete_form().validate("acc-7").expect("valid form");
    assert_eq!(record.age, 28);
    assert_eq!(record.gender, Gender::Male);
    assert_eq!(record.status, PatientStatus::Discharged);
    assert_eq!(
        record.visit_date,
        NaiveDate::from_ymd_opt(2023, 10, 18).expect("date")
    );
    assert_eq!(record.email.as_deref(), Some("ahmed.khan@example.com"));
    assert_eq!(record.address, None);
    assert_eq!(record.disease_description, None);
    assert_eq!(record.doctor_notes.as_deref(), Some("Recovery progressing well."));
    assert_eq!(record.doctor_id.as_deref(), Some("acc-7"));
}

#[test]
fn each_missing_required_field_rejects_the_whole_form() {
    let blank: Vec<(&str, fn(&mut PatientForm))> = vec![
        ("name", |f| f.name.clear()),
        ("age", |f| f.age.clear()),
        ("gender", |f| f.gender.clear()),
        ("cnic", |f| f.cnic.clear()),
        ("phone_number", |f| f.phone_number.clear()),
        ("disease", |f| f.disease.clear()),
        ("status", |f| f.status.clear()),
        ("visit_date", |f| f.visit_date.clear()),
    ];
    for (field, clear) in blank {
        let mut form = complete_form();
        clear(&mut form);
        let err = form.validate("acc-7").expect_err(field);
        assert_eq!(err.message, "Please fill in all required fields");
        assert_eq!(err.fields, vec![field]);
    }
}

#[test]
fn all_missing_fields_are_reported_together() {
    let err = PatientForm::default().validate("acc-7").expect_err("empty form");
    assert_eq!(err.message, "Please fill in all required fields");
    assert_eq!(err.fields.len(), 8);
}

#[test]
fn non_numeric_age_is_rejected_not_coerced() {
    let mut form = complete_form();
    form.age = "abc".to_string();
    let err = form.validate("acc-7").expect_err("age");
    assert_eq!(err.fields, vec!["age"]);

    form.age = "28.5".to_string();
    assert!(form.validate("acc-7").is_err());
}

#[test]
fn gender_status_and_date_must_parse_exactly() {
    let mut form = complete_form();
    form.gender = "male".to_string();
    assert_eq!(form.validate("acc-7").expect_err("gender").fields, vec!["gender"]);

    let mut form = complete_form();
    form.status = "discharged".to_string();
    assert_eq!(form.validate("acc-7").expect_err("status").fields, vec!["status"]);

    let mut form = complete_form();
    form.visit_date = "18-10-2023".to_string();
    assert_eq!(
        form.validate("acc-7").expect_err("visit date").fields,
        vec!["visit_date"]
    );
}

#[test]
fn initial_form_is_blank_except_todays_visit_date() {
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).expect("leap day");
    let form = PatientForm::initial(date);
    assert_eq!(form.visit_date, "2024-02-29");
    assert_eq!(
        PatientForm {
            visit_date: String::new(),
            ..form
        },
        PatientForm::default()
    );

    // The reset the create handler hands back uses the current day.
    let reset = PatientForm::initial(today());
    assert_eq!(reset.visit_date, today().to_string());
}
