//! The class store: single owner of the six state slots.
//!
//! Every mutation replaces a whole slot and then writes all six slots back to
//! storage. Each key is written independently; a failed write is logged and
//! otherwise ignored, so the in-memory state stays authoritative for the
//! session even when storage is full or unavailable.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::ids;
use crate::model::{
    seed_students, AttendanceRecord, AttendanceStatus, Gender, HomeVisit, Payment, Permit,
    PermitType, Slot, Student, TeacherProfile, VisitReason,
};
use crate::storage::Storage;

/// Whole-store document used for text export and import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDocument {
    pub students: Vec<Student>,
    pub attendance: Vec<AttendanceRecord>,
    pub permits: Vec<Permit>,
    pub payments: Vec<Payment>,
    pub visits: Vec<HomeVisit>,
    pub profile: TeacherProfile,
}

/// Read-only view of all slots at one point in time. Later replacements do not affect it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub students: Arc<Vec<Student>>,
    pub attendance: Arc<Vec<AttendanceRecord>>,
    pub permits: Arc<Vec<Permit>>,
    pub payments: Arc<Vec<Payment>>,
    pub visits: Arc<Vec<HomeVisit>>,
    pub profile: Arc<TeacherProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub failed: Vec<Slot>,
}

impl PersistReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct StudentDraft {
    pub nisn: String,
    pub name: String,
    pub class_name: String,
    pub gender: Gender,
    pub address: String,
    pub parent_name: String,
    pub parent_phone: String,
    pub is_active: bool,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
    pub nisn: Option<String>,
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub is_active: Option<bool>,
    /// `Some(None)` removes the photo.
    pub photo_url: Option<Option<String>>,
}

impl StudentPatch {
    fn apply(&self, s: &mut Student) {
        if let Some(v) = &self.nisn {
            s.nisn = v.clone();
        }
        if let Some(v) = &self.name {
            s.name = v.clone();
        }
        if let Some(v) = &self.class_name {
            s.class_name = v.clone();
        }
        if let Some(v) = self.gender {
            s.gender = v;
        }
        if let Some(v) = &self.address {
            s.address = v.clone();
        }
        if let Some(v) = &self.parent_name {
            s.parent_name = v.clone();
        }
        if let Some(v) = &self.parent_phone {
            s.parent_phone = v.clone();
        }
        if let Some(v) = self.is_active {
            s.is_active = v;
        }
        if let Some(v) = &self.photo_url {
            s.photo_url = v.clone();
        }
    }
}

#[derive(Debug, Clone)]
pub struct PermitDraft {
    pub student_id: String,
    pub kind: PermitType,
    pub start_date: String,
    pub end_date: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct PaymentDraft {
    pub student_id: String,
    pub kind: String,
    pub amount: f64,
    pub date: String,
    pub method: String,
}

#[derive(Debug, Clone)]
pub struct VisitDraft {
    pub student_id: String,
    pub date: String,
    pub reason: VisitReason,
    pub findings: String,
    pub follow_up: String,
    pub is_completed: bool,
}

pub struct ClassStore<S: Storage> {
    storage: S,
    students: Arc<Vec<Student>>,
    attendance: Arc<Vec<AttendanceRecord>>,
    permits: Arc<Vec<Permit>>,
    payments: Arc<Vec<Payment>>,
    visits: Arc<Vec<HomeVisit>>,
    profile: Arc<TeacherProfile>,
}

fn load_slot<T, S>(storage: &S, slot: Slot, default: impl FnOnce() -> T) -> T
where
    T: DeserializeOwned,
    S: Storage,
{
    match storage.read(slot.storage_key()) {
        Ok(Some(text)) => match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                warn!(slot = slot.name(), error = %e, "stored slot is malformed; using default");
                default()
            }
        },
        Ok(None) => {
            debug!(slot = slot.name(), "slot not stored yet; using default");
            default()
        }
        Err(e) => {
            warn!(slot = slot.name(), error = %e, "slot unreadable; using default");
            default()
        }
    }
}

impl<S: Storage> ClassStore<S> {
    /// Loads every slot from `storage`, falling back to that slot's default on any problem.
    pub fn load(storage: S) -> Self {
        let students = load_slot(&storage, Slot::Students, seed_students);
        let attendance = load_slot(&storage, Slot::Attendance, Vec::new);
        let permits = load_slot(&storage, Slot::Permits, Vec::new);
        let payments = load_slot(&storage, Slot::Payments, Vec::new);
        let visits = load_slot(&storage, Slot::Visits, Vec::new);
        let profile = load_slot(&storage, Slot::Profile, TeacherProfile::default);
        Self {
            storage,
            students: Arc::new(students),
            attendance: Arc::new(attendance),
            permits: Arc::new(permits),
            payments: Arc::new(payments),
            visits: Arc::new(visits),
            profile: Arc::new(profile),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    pub fn permits(&self) -> &[Permit] {
        &self.permits
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn visits(&self) -> &[HomeVisit] {
        &self.visits
    }

    pub fn profile(&self) -> &TeacherProfile {
        &self.profile
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            students: Arc::clone(&self.students),
            attendance: Arc::clone(&self.attendance),
            permits: Arc::clone(&self.permits),
            payments: Arc::clone(&self.payments),
            visits: Arc::clone(&self.visits),
            profile: Arc::clone(&self.profile),
        }
    }

    pub fn slot_value(&self, slot: Slot) -> serde_json::Result<serde_json::Value> {
        match slot {
            Slot::Students => serde_json::to_value(&*self.students),
            Slot::Attendance => serde_json::to_value(&*self.attendance),
            Slot::Permits => serde_json::to_value(&*self.permits),
            Slot::Payments => serde_json::to_value(&*self.payments),
            Slot::Visits => serde_json::to_value(&*self.visits),
            Slot::Profile => serde_json::to_value(&*self.profile),
        }
    }

    fn slot_text(&self, slot: Slot) -> serde_json::Result<String> {
        match slot {
            Slot::Students => serde_json::to_string(&*self.students),
            Slot::Attendance => serde_json::to_string(&*self.attendance),
            Slot::Permits => serde_json::to_string(&*self.permits),
            Slot::Payments => serde_json::to_string(&*self.payments),
            Slot::Visits => serde_json::to_string(&*self.visits),
            Slot::Profile => serde_json::to_string(&*self.profile),
        }
    }

    /// Writes each slot to its own key. Failures are logged and reported, never raised.
    pub fn persist(&mut self) -> PersistReport {
        let mut report = PersistReport::default();
        for slot in Slot::ALL {
            let text = match self.slot_text(slot) {
                Ok(t) => t,
                Err(e) => {
                    warn!(slot = slot.name(), error = %e, "failed to serialize slot");
                    report.failed.push(slot);
                    continue;
                }
            };
            if let Err(e) = self.storage.write(slot.storage_key(), &text) {
                warn!(slot = slot.name(), error = %e, "failed to persist slot; keeping in-memory state");
                report.failed.push(slot);
            }
        }
        report
    }

    pub fn replace_students(&mut self, next: Vec<Student>) -> PersistReport {
        debug!(slot = "students", len = next.len(), "replace");
        self.students = Arc::new(next);
        self.persist()
    }

    pub fn replace_attendance(&mut self, next: Vec<AttendanceRecord>) -> PersistReport {
        debug!(slot = "attendance", len = next.len(), "replace");
        self.attendance = Arc::new(next);
        self.persist()
    }

    pub fn replace_permits(&mut self, next: Vec<Permit>) -> PersistReport {
        debug!(slot = "permits", len = next.len(), "replace");
        self.permits = Arc::new(next);
        self.persist()
    }

    pub fn replace_payments(&mut self, next: Vec<Payment>) -> PersistReport {
        debug!(slot = "payments", len = next.len(), "replace");
        self.payments = Arc::new(next);
        self.persist()
    }

    pub fn replace_visits(&mut self, next: Vec<HomeVisit>) -> PersistReport {
        debug!(slot = "visits", len = next.len(), "replace");
        self.visits = Arc::new(next);
        self.persist()
    }

    pub fn set_profile(&mut self, next: TeacherProfile) -> PersistReport {
        debug!(slot = "profile", "replace");
        self.profile = Arc::new(next);
        self.persist()
    }

    /// Replaces one slot from its JSON form. The slot is untouched if `value` does not parse.
    pub fn replace_slot_json(
        &mut self,
        slot: Slot,
        value: serde_json::Value,
    ) -> serde_json::Result<PersistReport> {
        let report = match slot {
            Slot::Students => self.replace_students(serde_json::from_value(value)?),
            Slot::Attendance => self.replace_attendance(serde_json::from_value(value)?),
            Slot::Permits => self.replace_permits(serde_json::from_value(value)?),
            Slot::Payments => self.replace_payments(serde_json::from_value(value)?),
            Slot::Visits => self.replace_visits(serde_json::from_value(value)?),
            Slot::Profile => self.set_profile(serde_json::from_value(value)?),
        };
        Ok(report)
    }

    pub fn add_student(&mut self, draft: StudentDraft) -> String {
        let id = ids::new_id();
        let mut next = self.students.to_vec();
        next.push(Student {
            id: id.clone(),
            nisn: draft.nisn,
            name: draft.name,
            class_name: draft.class_name,
            gender: draft.gender,
            address: draft.address,
            parent_name: draft.parent_name,
            parent_phone: draft.parent_phone,
            is_active: draft.is_active,
            photo_url: draft.photo_url,
        });
        self.replace_students(next);
        id
    }

    pub fn update_student(&mut self, id: &str, patch: &StudentPatch) -> bool {
        if !self.students.iter().any(|s| s.id == id) {
            return false;
        }
        let next = self
            .students
            .iter()
            .map(|s| {
                let mut s = s.clone();
                if s.id == id {
                    patch.apply(&mut s);
                }
                s
            })
            .collect();
        self.replace_students(next);
        true
    }

    /// Removes the student only. Records in other slots that reference it are left as they are.
    pub fn delete_student(&mut self, id: &str) -> bool {
        if !self.students.iter().any(|s| s.id == id) {
            return false;
        }
        let next = self.students.iter().filter(|s| s.id != id).cloned().collect();
        self.replace_students(next);
        true
    }

    /// Replaces every record for `date` with `statuses`; other dates are kept in order.
    /// A student listed twice keeps its first position and its last status.
    pub fn save_attendance<I>(&mut self, date: &str, statuses: I) -> usize
    where
        I: IntoIterator<Item = (String, AttendanceStatus)>,
    {
        let mut day: Vec<AttendanceRecord> = Vec::new();
        for (student_id, status) in statuses {
            match day.iter_mut().find(|r| r.student_id == student_id) {
                Some(r) => r.status = status,
                None => day.push(AttendanceRecord {
                    date: date.to_string(),
                    student_id,
                    status,
                }),
            }
        }
        let saved = day.len();
        let mut next: Vec<AttendanceRecord> = self
            .attendance
            .iter()
            .filter(|r| r.date != date)
            .cloned()
            .collect();
        next.extend(day);
        self.replace_attendance(next);
        saved
    }

    pub fn add_permit(&mut self, draft: PermitDraft) -> String {
        let id = ids::new_id();
        let permit = Permit {
            id: id.clone(),
            student_id: draft.student_id,
            kind: draft.kind,
            start_date: draft.start_date,
            end_date: draft.end_date,
            reason: draft.reason,
            created_at: chrono::Utc::now()
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        };
        let mut next = Vec::with_capacity(self.permits.len() + 1);
        next.push(permit);
        next.extend(self.permits.iter().cloned());
        self.replace_permits(next);
        id
    }

    pub fn delete_permit(&mut self, id: &str) -> bool {
        if !self.permits.iter().any(|p| p.id == id) {
            return false;
        }
        let next = self.permits.iter().filter(|p| p.id != id).cloned().collect();
        self.replace_permits(next);
        true
    }

    /// Appends a payment under a fresh `TXN` code, so the slot stays in insertion order.
    pub fn add_payment(&mut self, draft: PaymentDraft) -> String {
        let id = ids::new_transaction_code(|code| self.payments.iter().any(|p| p.id == code));
        let mut next = self.payments.to_vec();
        next.push(Payment {
            id: id.clone(),
            student_id: draft.student_id,
            kind: draft.kind,
            amount: draft.amount,
            date: draft.date,
            method: draft.method,
        });
        self.replace_payments(next);
        id
    }

    pub fn add_visit(&mut self, draft: VisitDraft) -> String {
        let id = ids::new_id();
        let visit = HomeVisit {
            id: id.clone(),
            student_id: draft.student_id,
            date: draft.date,
            reason: draft.reason,
            findings: draft.findings,
            follow_up: draft.follow_up,
            is_completed: draft.is_completed,
        };
        let mut next = Vec::with_capacity(self.visits.len() + 1);
        next.push(visit);
        next.extend(self.visits.iter().cloned());
        self.replace_visits(next);
        id
    }

    /// Flips `isCompleted` on one visit. Returns the new value, or `None` if no such visit.
    pub fn toggle_visit(&mut self, id: &str) -> Option<bool> {
        let current = self.visits.iter().find(|v| v.id == id)?.is_completed;
        let next = self
            .visits
            .iter()
            .map(|v| {
                let mut v = v.clone();
                if v.id == id {
                    v.is_completed = !v.is_completed;
                }
                v
            })
            .collect();
        self.replace_visits(next);
        Some(!current)
    }

    pub fn document(&self) -> StoreDocument {
        StoreDocument {
            students: self.students.to_vec(),
            attendance: self.attendance.to_vec(),
            permits: self.permits.to_vec(),
            payments: self.payments.to_vec(),
            visits: self.visits.to_vec(),
            profile: (*self.profile).clone(),
        }
    }

    pub fn export_text(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.document())
    }

    /// Replaces all six slots from exported text. Nothing changes if the text does not parse.
    pub fn import_text(&mut self, text: &str) -> serde_json::Result<PersistReport> {
        let doc: StoreDocument = serde_json::from_str(text)?;
        Ok(self.import_document(doc))
    }

    pub fn import_document(&mut self, doc: StoreDocument) -> PersistReport {
        self.students = Arc::new(doc.students);
        self.attendance = Arc::new(doc.attendance);
        self.permits = Arc::new(doc.permits);
        self.payments = Arc::new(doc.payments);
        self.visits = Arc::new(doc.visits);
        self.profile = Arc::new(doc.profile);
        self.persist()
    }

    /// Drops every stored key and resets each slot to its default, as a fresh load would see it.
    pub fn clear(&mut self) {
        for slot in Slot::ALL {
            if let Err(e) = self.storage.remove(slot.storage_key()) {
                warn!(slot = slot.name(), error = %e, "failed to remove stored slot");
            }
        }
        self.students = Arc::new(seed_students());
        self.attendance = Arc::new(Vec::new());
        self.permits = Arc::new(Vec::new());
        self.payments = Arc::new(Vec::new());
        self.visits = Arc::new(Vec::new());
        self.profile = Arc::new(TeacherProfile::default());
    }
}
