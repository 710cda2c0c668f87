use kingclass::model::{
    seed_students, AttendanceRecord, AttendanceStatus, Gender, HomeVisit, Payment, Permit,
    PermitType, Slot, Student, TeacherProfile, VisitReason,
};
use kingclass::storage::{MemoryStorage, SqliteStorage, Storage};
use kingclass::store::{ClassStore, PaymentDraft};
use kingclass::views;

fn student(id: &str, name: &str, active: bool) -> Student {
    Student {
        id: id.to_string(),
        nisn: format!("00{}", id),
        name: name.to_string(),
        class_name: "XI TKJ 2".to_string(),
        gender: Gender::P,
        address: "Jl. Kenanga 1".to_string(),
        parent_name: "Wati".to_string(),
        parent_phone: "0811".to_string(),
        is_active: active,
        photo_url: None,
    }
}

fn record(date: &str, sid: &str, status: AttendanceStatus) -> AttendanceRecord {
    AttendanceRecord {
        date: date.to_string(),
        student_id: sid.to_string(),
        status,
    }
}

fn sample_permits() -> Vec<Permit> {
    vec![Permit {
        id: "p1".to_string(),
        student_id: "s1".to_string(),
        kind: PermitType::KeperluanKeluarga,
        start_date: "2024-03-02".to_string(),
        end_date: "2024-03-01".to_string(),
        reason: "pernikahan kakak".to_string(),
        created_at: "2024-03-01T07:00:00.000Z".to_string(),
    }]
}

fn sample_payments() -> Vec<Payment> {
    vec![
        Payment {
            id: "TXNAAAAAA".to_string(),
            student_id: "s1".to_string(),
            kind: "SPP".to_string(),
            amount: 150000.5,
            date: "2024-03-01".to_string(),
            method: "Transfer".to_string(),
        },
        Payment {
            id: "TXNBBBBBB".to_string(),
            student_id: "s2".to_string(),
            kind: "Uang Kas".to_string(),
            amount: 0.0,
            date: "2024-03-02".to_string(),
            method: "Tunai".to_string(),
        },
    ]
}

fn sample_visits() -> Vec<HomeVisit> {
    vec![HomeVisit {
        id: "v1".to_string(),
        student_id: "s2".to_string(),
        date: "2024-03-05".to_string(),
        reason: VisitReason::Ekonomi,
        findings: "orang tua kehilangan pekerjaan".to_string(),
        follow_up: "ajukan keringanan".to_string(),
        is_completed: false,
    }]
}

fn sample_profile() -> TeacherProfile {
    TeacherProfile {
        name: "Ibu Rina".to_string(),
        nip: "19900101 201501 2 001".to_string(),
        class_name: "XI TKJ 2".to_string(),
        academic_year: "2024/2025".to_string(),
        signature_url: Some("file:///ttd.png".to_string()),
    }
}

#[test]
fn every_slot_round_trips_through_sqlite_storage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let students = vec![student("s1", "Rani", true), student("s2", "Dodi", false)];
    let attendance = vec![
        record("2024-03-01", "s1", AttendanceStatus::Izin),
        record("2024-03-02", "s1", AttendanceStatus::Hadir),
    ];
    {
        let mut store = ClassStore::load(SqliteStorage::open(dir.path()).expect("open"));
        store.replace_students(students.clone());
        store.replace_attendance(attendance.clone());
        store.replace_permits(sample_permits());
        store.replace_payments(sample_payments());
        store.replace_visits(sample_visits());
        let report = store.set_profile(sample_profile());
        assert!(report.is_complete());
    }

    let reopened = ClassStore::load(SqliteStorage::open(dir.path()).expect("reopen"));
    assert_eq!(reopened.students(), students.as_slice());
    assert_eq!(reopened.attendance(), attendance.as_slice());
    assert_eq!(reopened.permits(), sample_permits().as_slice());
    assert_eq!(reopened.payments(), sample_payments().as_slice());
    assert_eq!(reopened.visits(), sample_visits().as_slice());
    assert_eq!(reopened.profile(), &sample_profile());
}

#[test]
fn empty_collections_round_trip_instead_of_reseeding() {
    let mut store = ClassStore::load(MemoryStorage::new());
    store.replace_students(Vec::new());
    let reopened = ClassStore::load(store.into_storage());
    assert!(reopened.students().is_empty());
}

#[test]
fn stored_text_uses_camel_case_field_names() {
    let mut store = ClassStore::load(MemoryStorage::new());
    store.replace_permits(sample_permits());
    let text = store
        .storage()
        .read(Slot::Permits.storage_key())
        .expect("read")
        .expect("stored");
    let v: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(v[0]["type"], "Keperluan Keluarga");
    assert_eq!(v[0]["studentId"], "s1");
    assert_eq!(v[0]["createdAt"], "2024-03-01T07:00:00.000Z");
}

#[test]
fn corrupt_slot_falls_back_to_its_default_only() {
    for corrupt in Slot::ALL {
        let mut seeded = ClassStore::load(MemoryStorage::new());
        seeded.replace_students(vec![student("s1", "Rani", true)]);
        seeded.replace_attendance(vec![record("2024-03-01", "s1", AttendanceStatus::Hadir)]);
        seeded.replace_permits(sample_permits());
        seeded.replace_payments(sample_payments());
        seeded.replace_visits(sample_visits());
        seeded.set_profile(sample_profile());

        let mut storage = seeded.into_storage();
        storage
            .write(corrupt.storage_key(), "{not json")
            .expect("write garbage");
        let store = ClassStore::load(storage);

        let expect_default = |slot: Slot| slot == corrupt;
        if expect_default(Slot::Students) {
            assert_eq!(store.students(), seed_students().as_slice());
        } else {
            assert_eq!(store.students().len(), 1);
        }
        assert_eq!(store.attendance().is_empty(), expect_default(Slot::Attendance));
        assert_eq!(store.permits().is_empty(), expect_default(Slot::Permits));
        assert_eq!(store.payments().is_empty(), expect_default(Slot::Payments));
        assert_eq!(store.visits().is_empty(), expect_default(Slot::Visits));
        assert_eq!(
            store.profile() == &TeacherProfile::default(),
            expect_default(Slot::Profile),
            "profile slot, corrupted = {:?}",
            corrupt
        );
    }
}

#[test]
fn wrong_shape_is_treated_like_malformed_text() {
    let mut storage = MemoryStorage::new();
    storage
        .write(Slot::Payments.storage_key(), r#"{"id":"TXN1"}"#)
        .expect("write");
    storage
        .write(Slot::Visits.storage_key(), "null")
        .expect("write");
    let store = ClassStore::load(storage);
    assert!(store.payments().is_empty());
    assert!(store.visits().is_empty());
    assert_eq!(store.students().len(), 3);
}

#[test]
fn unavailable_storage_keeps_memory_authoritative() {
    let mut storage = MemoryStorage::new();
    storage.set_unavailable(true);
    let mut store = ClassStore::load(storage);
    assert_eq!(store.students().len(), 3);

    let id = store.add_payment(PaymentDraft {
        student_id: "1".to_string(),
        kind: "SPP".to_string(),
        amount: 75000.0,
        date: "2024-03-01".to_string(),
        method: "Tunai".to_string(),
    });
    assert_eq!(store.payments()[0].id, id);
    let report = store.persist();
    assert_eq!(report.failed, Slot::ALL.to_vec());

    store.storage_mut().set_unavailable(false);
    let reopened = ClassStore::load(store.into_storage());
    assert!(reopened.payments().is_empty());
}

#[test]
fn quota_failure_on_one_slot_does_not_block_the_others() {
    let mut store = ClassStore::load(MemoryStorage::with_quota(4096));
    store.replace_students(vec![student("s1", "Rani", true)]);
    store.set_profile(sample_profile());

    let big: Vec<AttendanceRecord> = (0..200)
        .map(|i| {
            let date = format!("2024-01-{:02}", i % 28 + 1);
            record(&date, &format!("s{}", i), AttendanceStatus::Hadir)
        })
        .collect();
    let report = store.replace_attendance(big);
    assert_eq!(report.failed, vec![Slot::Attendance]);
    assert_eq!(store.attendance().len(), 200);

    let mut renamed = store.profile().clone();
    renamed.name = "Pak Joko".to_string();
    store.set_profile(renamed);

    let reopened = ClassStore::load(store.into_storage());
    assert!(reopened.attendance().is_empty());
    assert_eq!(reopened.profile().name, "Pak Joko");
    assert_eq!(reopened.students().len(), 1);
}

#[test]
fn saving_a_date_replaces_only_that_date() {
    let mut store = ClassStore::load(MemoryStorage::new());
    store.replace_attendance(vec![
        record("2024-03-01", "1", AttendanceStatus::Hadir),
        record("2024-03-02", "1", AttendanceStatus::Sakit),
        record("2024-03-01", "2", AttendanceStatus::Hadir),
    ]);

    store.save_attendance("2024-03-01", vec![("1".to_string(), AttendanceStatus::Alpha)]);

    assert_eq!(
        store.attendance(),
        &[
            record("2024-03-02", "1", AttendanceStatus::Sakit),
            record("2024-03-01", "1", AttendanceStatus::Alpha),
        ]
    );
    assert_eq!(views::attendance_for("2024-03-01", store.attendance()).len(), 1);

    store.save_attendance("2024-03-01", vec![("1".to_string(), AttendanceStatus::Alpha)]);
    assert_eq!(store.attendance().len(), 2);
}

#[test]
fn deleting_a_student_leaves_payment_as_orphan() {
    let mut store = ClassStore::load(MemoryStorage::new());
    store.add_payment(PaymentDraft {
        student_id: "2".to_string(),
        kind: "Kegiatan".to_string(),
        amount: 50000.0,
        date: "2024-03-01".to_string(),
        method: "Tunai".to_string(),
    });
    assert_eq!(views::student_name(store.students(), "2"), "Siti Aminah");

    assert!(store.delete_student("2"));
    assert_eq!(store.payments().len(), 1);
    assert_eq!(store.payments()[0].student_id, "2");
    assert_eq!(views::student_name(store.students(), "2"), views::UNKNOWN_STUDENT);

    let summary = views::dashboard_summary(
        "2024-03-01",
        store.students(),
        store.attendance(),
        store.permits(),
        store.payments(),
        store.visits(),
    );
    assert_eq!(summary.recent_transactions[0].student_name, "Unknown");
}

#[test]
fn export_then_import_restores_every_slot() {
    let mut source = ClassStore::load(MemoryStorage::new());
    source.replace_permits(sample_permits());
    source.replace_payments(sample_payments());
    source.replace_visits(sample_visits());
    source.set_profile(sample_profile());
    source.save_attendance("2024-03-01", vec![("3".to_string(), AttendanceStatus::Sakit)]);
    let text = source.export_text().expect("export");

    let mut target = ClassStore::load(MemoryStorage::new());
    target.replace_students(Vec::new());
    target.import_text(&text).expect("import");
    assert_eq!(target.document(), source.document());

    let reopened = ClassStore::load(target.into_storage());
    assert_eq!(reopened.document(), source.document());
}

#[test]
fn malformed_import_leaves_state_untouched() {
    let mut store = ClassStore::load(MemoryStorage::new());
    store.replace_payments(sample_payments());
    assert!(store.import_text("[1, 2").is_err());
    assert!(store.import_text(r#"{"students": []}"#).is_err());
    assert_eq!(store.payments(), sample_payments().as_slice());
    assert_eq!(store.students().len(), 3);
}

#[test]
fn payment_amounts_reload_bit_for_bit() {
    let amounts = [
        1.0715660391465826e-75,
        115962569494.08667,
        0.1 + 0.2,
        12345678.9 / 3.0,
        f64::MAX,
    ];
    let payments: Vec<Payment> = amounts
        .iter()
        .enumerate()
        .map(|(i, &amount)| Payment {
            id: format!("TXN00000{}", i),
            student_id: "1".to_string(),
            kind: "SPP".to_string(),
            amount,
            date: "2024-03-01".to_string(),
            method: "Tunai".to_string(),
        })
        .collect();

    let mut store = ClassStore::load(MemoryStorage::new());
    store.replace_payments(payments.clone());
    let reopened = ClassStore::load(store.into_storage());
    for (before, after) in payments.iter().zip(reopened.payments()) {
        assert_eq!(before.amount.to_bits(), after.amount.to_bits(), "{}", before.amount);
    }

    let text = reopened.export_text().expect("export");
    let mut target = ClassStore::load(MemoryStorage::new());
    target.import_text(&text).expect("import");
    assert_eq!(target.payments(), payments.as_slice());
}
