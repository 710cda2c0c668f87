use kingclass::model::{AttendanceStatus, VisitReason};
use kingclass::storage::MemoryStorage;
use kingclass::store::{ClassStore, PaymentDraft, StudentDraft, VisitDraft};
use kingclass::views::{self, BucketKind, VisitFilter};

const DAY: &str = "2024-04-15";

fn pay(student_id: &str, amount: f64) -> PaymentDraft {
    PaymentDraft {
        student_id: student_id.to_string(),
        kind: "SPP".to_string(),
        amount,
        date: DAY.to_string(),
        method: "Tunai".to_string(),
    }
}

fn visit(student_id: &str) -> VisitDraft {
    VisitDraft {
        student_id: student_id.to_string(),
        date: DAY.to_string(),
        reason: VisitReason::Perilaku,
        findings: String::new(),
        follow_up: String::new(),
        is_completed: false,
    }
}

fn breakdown_sum(store: &ClassStore<MemoryStorage>) -> i64 {
    views::attendance_breakdown(DAY, store.students(), store.attendance())
        .buckets
        .iter()
        .map(|b| b.value)
        .sum()
}

#[test]
fn breakdown_sums_to_active_population_when_marked_students_are_active() {
    let mut store = ClassStore::load(MemoryStorage::new());
    assert_eq!(breakdown_sum(&store), 3);

    store.save_attendance(DAY, vec![("1".to_string(), AttendanceStatus::Hadir)]);
    assert_eq!(breakdown_sum(&store), 3);

    store.save_attendance(
        DAY,
        vec![
            ("1".to_string(), AttendanceStatus::Hadir),
            ("2".to_string(), AttendanceStatus::Sakit),
            ("3".to_string(), AttendanceStatus::Alpha),
        ],
    );
    let b = views::attendance_breakdown(DAY, store.students(), store.attendance());
    assert!(b.consistent);
    assert_eq!(b.value(BucketKind::Present), 1);
    assert_eq!(b.value(BucketKind::Absent), 1);
    assert_eq!(b.value(BucketKind::Other), 1);
    assert_eq!(b.value(BucketKind::Unmarked), 0);
    assert_eq!(breakdown_sum(&store), 3);
}

#[test]
fn breakdown_with_no_active_students_and_no_records_is_a_single_placeholder() {
    let mut store = ClassStore::load(MemoryStorage::new());
    store.replace_students(Vec::new());
    let b = views::attendance_breakdown(DAY, store.students(), store.attendance());
    assert_eq!(b.buckets.len(), 1);
    assert_eq!(b.buckets[0].kind, BucketKind::NoData);
    assert_eq!(b.buckets[0].value, 1);
    assert!(b.consistent);
}

#[test]
fn breakdown_flags_records_for_inactive_students() {
    let mut store = ClassStore::load(MemoryStorage::new());
    store.save_attendance(
        DAY,
        vec![
            ("1".to_string(), AttendanceStatus::Hadir),
            ("2".to_string(), AttendanceStatus::Hadir),
            ("3".to_string(), AttendanceStatus::Hadir),
        ],
    );
    let patch = kingclass::store::StudentPatch {
        is_active: Some(false),
        ..Default::default()
    };
    store.update_student("3", &patch);

    let b = views::attendance_breakdown(DAY, store.students(), store.attendance());
    assert!(!b.consistent);
    assert_eq!(b.value(BucketKind::Present), 3);
    assert_eq!(b.value(BucketKind::Unmarked), 0);
}

#[test]
fn total_collected_is_additive() {
    let mut store = ClassStore::load(MemoryStorage::new());
    store.add_payment(pay("1", 100000.0));
    store.add_payment(pay("2", 25000.0));
    let before = views::total_collected(store.payments());
    store.add_payment(pay("3", 12500.0));
    assert_eq!(views::total_collected(store.payments()), before + 12500.0);
    assert_eq!(views::total_collected(store.payments()), 137500.0);
}

#[test]
fn recent_transactions_are_the_five_newest_newest_first() {
    let mut store = ClassStore::load(MemoryStorage::new());
    let ids: Vec<String> = (1..=6)
        .map(|i| store.add_payment(pay("1", i as f64 * 1000.0)))
        .collect();

    let recent: Vec<&str> = views::recent_transactions(store.payments(), views::RECENT_TRANSACTIONS)
        .into_iter()
        .map(|p| p.id.as_str())
        .collect();
    let expected: Vec<&str> = ids[1..].iter().rev().map(String::as_str).collect();
    assert_eq!(recent, expected);

    let summary = views::dashboard_summary(
        DAY,
        store.students(),
        store.attendance(),
        store.permits(),
        store.payments(),
        store.visits(),
    );
    assert_eq!(summary.recent_transactions.len(), 5);
    assert_eq!(summary.recent_transactions[0].id, ids[5]);
    assert_eq!(summary.recent_transactions[0].student_name, "Ahmad Faisal");
}

#[test]
fn toggling_a_visit_moves_the_pending_count_by_one() {
    let mut store = ClassStore::load(MemoryStorage::new());
    store.add_visit(visit("1"));
    let id = store.add_visit(visit("2"));
    assert_eq!(views::pending_visit_count(store.visits()), 2);

    assert_eq!(store.toggle_visit(&id), Some(true));
    assert_eq!(views::pending_visit_count(store.visits()), 1);
    assert_eq!(views::filter_visits(store.visits(), VisitFilter::Completed).len(), 1);

    assert_eq!(store.toggle_visit(&id), Some(false));
    assert_eq!(views::pending_visit_count(store.visits()), 2);
}

#[test]
fn search_matches_name_case_insensitively_or_nisn_substring() {
    let mut store = ClassStore::load(MemoryStorage::new());
    store.add_student(StudentDraft {
        nisn: "0098765432".to_string(),
        name: "Dewi Lestari".to_string(),
        class_name: "XII RPL 1".to_string(),
        gender: kingclass::model::Gender::P,
        address: String::new(),
        parent_name: String::new(),
        parent_phone: String::new(),
        is_active: true,
        photo_url: None,
    });

    let names = |term: &str| -> Vec<String> {
        views::search_students(store.students(), term)
            .into_iter()
            .map(|s| s.name.clone())
            .collect()
    };
    assert_eq!(names("dewi"), vec!["Dewi Lestari".to_string()]);
    assert_eq!(names("98765"), vec!["Dewi Lestari".to_string()]);
    assert_eq!(names("").len(), 4);
    assert!(names("zzz").is_empty());
}

#[test]
fn report_counts_follow_collection_sizes() {
    let mut store = ClassStore::load(MemoryStorage::new());
    store.save_attendance(DAY, vec![("1".to_string(), AttendanceStatus::Izin)]);
    store.add_payment(pay("1", 1.0));
    store.add_payment(pay("2", 1.0));
    store.add_visit(visit("3"));

    let counts = views::report_counts(
        store.attendance(),
        store.payments(),
        store.visits(),
        store.permits(),
    );
    assert_eq!(counts.attendance, 1);
    assert_eq!(counts.payments, 2);
    assert_eq!(counts.visits, 1);
    assert_eq!(counts.permits, 0);
}
