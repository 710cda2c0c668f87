//! Derived views over the store slots. Everything here is pure and recomputed per call.

use serde::Serialize;

use crate::model::{AttendanceRecord, AttendanceStatus, HomeVisit, Payment, Permit, Student};

pub const UNKNOWN_STUDENT: &str = "Unknown";
pub const RECENT_TRANSACTIONS: usize = 5;

pub fn active_student_count(students: &[Student]) -> usize {
    students.iter().filter(|s| s.is_active).count()
}

pub fn attendance_for<'a>(date: &str, records: &'a [AttendanceRecord]) -> Vec<&'a AttendanceRecord> {
    records.iter().filter(|r| r.date == date).collect()
}

pub fn present_count(day: &[&AttendanceRecord]) -> usize {
    day.iter().filter(|r| r.status == AttendanceStatus::Hadir).count()
}

pub fn absent_count(day: &[&AttendanceRecord]) -> usize {
    day.iter().filter(|r| r.status == AttendanceStatus::Alpha).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BucketKind {
    Present,
    Absent,
    Other,
    Unmarked,
    NoData,
}

impl BucketKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Present => "Hadir",
            Self::Absent => "Alpha",
            Self::Other => "Izin/Sakit",
            Self::Unmarked => "Belum Absen",
            Self::NoData => "Belum Ada Data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub kind: BucketKind,
    pub label: &'static str,
    pub value: i64,
}

impl Bucket {
    fn new(kind: BucketKind, value: i64) -> Self {
        Self {
            kind,
            label: kind.label(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceBreakdown {
    pub buckets: Vec<Bucket>,
    /// False when `other` or `unmarked` came out negative, i.e. the day has records
    /// for students who are not (or no longer) active.
    pub consistent: bool,
}

impl AttendanceBreakdown {
    pub fn value(&self, kind: BucketKind) -> i64 {
        self.buckets
            .iter()
            .find(|b| b.kind == kind)
            .map(|b| b.value)
            .unwrap_or(0)
    }
}

/// Present / absent / other / unmarked for one day. Buckets at or below zero are
/// left out; with nothing left a single `NoData` bucket of 1 is returned.
pub fn attendance_breakdown(
    date: &str,
    students: &[Student],
    records: &[AttendanceRecord],
) -> AttendanceBreakdown {
    let day = attendance_for(date, records);
    let active = active_student_count(students) as i64;
    let marked = day.len() as i64;
    let present = present_count(&day) as i64;
    let absent = absent_count(&day) as i64;
    let other = marked - present - absent;
    let unmarked = active - marked;

    let consistent = other >= 0 && unmarked >= 0;
    if !consistent {
        tracing::warn!(date, other, unmarked, "attendance breakdown has negative buckets");
    }

    let mut buckets: Vec<Bucket> = [
        (BucketKind::Present, present),
        (BucketKind::Absent, absent),
        (BucketKind::Other, other),
        (BucketKind::Unmarked, unmarked),
    ]
    .into_iter()
    .filter(|(_, v)| *v > 0)
    .map(|(k, v)| Bucket::new(k, v))
    .collect();
    if buckets.is_empty() {
        buckets.push(Bucket::new(BucketKind::NoData, 1));
    }
    AttendanceBreakdown {
        buckets,
        consistent,
    }
}

/// The last `n` payments in slot order, most recent first.
pub fn recent_transactions(payments: &[Payment], n: usize) -> Vec<&Payment> {
    let start = payments.len().saturating_sub(n);
    payments[start..].iter().rev().collect()
}

pub fn total_collected(payments: &[Payment]) -> f64 {
    payments.iter().map(|p| p.amount).sum()
}

pub fn pending_visit_count(visits: &[HomeVisit]) -> usize {
    visits.iter().filter(|v| !v.is_completed).count()
}

pub fn find_student<'a>(students: &'a [Student], id: &str) -> Option<&'a Student> {
    students.iter().find(|s| s.id == id)
}

pub fn student_name<'a>(students: &'a [Student], id: &str) -> &'a str {
    find_student(students, id)
        .map(|s| s.name.as_str())
        .unwrap_or(UNKNOWN_STUDENT)
}

pub fn student_matches(student: &Student, term: &str) -> bool {
    student.name.to_lowercase().contains(&term.to_lowercase()) || student.nisn.contains(term)
}

pub fn payment_matches(payment: &Payment, students: &[Student], term: &str) -> bool {
    let term = term.to_lowercase();
    let by_name = find_student(students, &payment.student_id)
        .map(|s| s.name.to_lowercase().contains(&term))
        .unwrap_or(false);
    by_name || payment.kind.to_lowercase().contains(&term)
}

pub fn search_students<'a>(students: &'a [Student], term: &str) -> Vec<&'a Student> {
    students.iter().filter(|s| student_matches(s, term)).collect()
}

pub fn search_payments<'a>(
    payments: &'a [Payment],
    students: &[Student],
    term: &str,
) -> Vec<&'a Payment> {
    payments
        .iter()
        .filter(|p| payment_matches(p, students, term))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitFilter {
    All,
    Completed,
    Pending,
}

impl VisitFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

pub fn filter_visits(visits: &[HomeVisit], filter: VisitFilter) -> Vec<&HomeVisit> {
    visits
        .iter()
        .filter(|v| match filter {
            VisitFilter::All => true,
            VisitFilter::Completed => v.is_completed,
            VisitFilter::Pending => !v.is_completed,
        })
        .collect()
}

pub fn permits_for_student<'a>(permits: &'a [Permit], student_id: &str) -> Vec<&'a Permit> {
    permits.iter().filter(|p| p.student_id == student_id).collect()
}

/// Students shown on the attendance entry sheet.
pub fn attendance_roster(students: &[Student]) -> Vec<&Student> {
    students.iter().filter(|s| s.is_active).collect()
}

/// Status shown for a student on the entry sheet: the stored one, else Hadir.
pub fn attendance_status_for(day: &[&AttendanceRecord], student_id: &str) -> AttendanceStatus {
    day.iter()
        .find(|r| r.student_id == student_id)
        .map(|r| r.status)
        .unwrap_or(AttendanceStatus::Hadir)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecap {
    pub hadir: usize,
    pub izin: usize,
    pub sakit: usize,
    pub alpha: usize,
    pub days: usize,
}

/// Per-status totals for one student across every recorded date.
pub fn student_attendance_recap(records: &[AttendanceRecord], student_id: &str) -> AttendanceRecap {
    let mut recap = AttendanceRecap::default();
    for r in records.iter().filter(|r| r.student_id == student_id) {
        recap.days += 1;
        match r.status {
            AttendanceStatus::Hadir => recap.hadir += 1,
            AttendanceStatus::Izin => recap.izin += 1,
            AttendanceStatus::Sakit => recap.sakit += 1,
            AttendanceStatus::Alpha => recap.alpha += 1,
        }
    }
    recap
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCounts {
    pub attendance: usize,
    pub payments: usize,
    pub visits: usize,
    pub permits: usize,
}

pub fn report_counts(
    attendance: &[AttendanceRecord],
    payments: &[Payment],
    visits: &[HomeVisit],
    permits: &[Permit],
) -> ReportCounts {
    ReportCounts {
        attendance: attendance.len(),
        payments: payments.len(),
        visits: visits.len(),
        permits: permits.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransaction {
    pub id: String,
    pub student_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub date: String,
    pub active_students: usize,
    pub present_today: usize,
    pub absent_today: usize,
    pub permit_count: usize,
    pub pending_visits: usize,
    pub total_collected: f64,
    pub breakdown: AttendanceBreakdown,
    pub recent_transactions: Vec<RecentTransaction>,
}

pub fn dashboard_summary(
    date: &str,
    students: &[Student],
    attendance: &[AttendanceRecord],
    permits: &[Permit],
    payments: &[Payment],
    visits: &[HomeVisit],
) -> DashboardSummary {
    let day = attendance_for(date, attendance);
    let recent = recent_transactions(payments, RECENT_TRANSACTIONS)
        .into_iter()
        .map(|p| RecentTransaction {
            id: p.id.clone(),
            student_name: student_name(students, &p.student_id).to_string(),
            kind: p.kind.clone(),
            amount: p.amount,
            date: p.date.clone(),
        })
        .collect();
    DashboardSummary {
        date: date.to_string(),
        active_students: active_student_count(students),
        present_today: present_count(&day),
        absent_today: absent_count(&day),
        permit_count: permits.len(),
        pending_visits: pending_visit_count(visits),
        total_collected: total_collected(payments),
        breakdown: attendance_breakdown(date, students, attendance),
        recent_transactions: recent,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    pub id: String,
    pub student_name: String,
    pub date: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentArchive {
    pub permits: Vec<ArchiveEntry>,
    pub payments: Vec<ArchiveEntry>,
    pub visits: Vec<ArchiveEntry>,
}

/// Permit letters, payment receipts and visit logs with student names resolved.
pub fn document_archive(
    students: &[Student],
    permits: &[Permit],
    payments: &[Payment],
    visits: &[HomeVisit],
) -> DocumentArchive {
    let name = |id: &str| student_name(students, id).to_string();
    DocumentArchive {
        permits: permits
            .iter()
            .map(|p| ArchiveEntry {
                id: p.id.clone(),
                student_name: name(&p.student_id),
                date: p.start_date.clone(),
                detail: serde_json::to_value(p.kind)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default(),
            })
            .collect(),
        payments: payments
            .iter()
            .map(|p| ArchiveEntry {
                id: p.id.clone(),
                student_name: name(&p.student_id),
                date: p.date.clone(),
                detail: p.kind.clone(),
            })
            .collect(),
        visits: visits
            .iter()
            .map(|v| ArchiveEntry {
                id: v.id.clone(),
                student_name: name(&v.student_id),
                date: v.date.clone(),
                detail: serde_json::to_value(v.reason)
                    .ok()
                    .and_then(|x| x.as_str().map(str::to_string))
                    .unwrap_or_default(),
            })
            .collect(),
    }
}
