use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Laki-laki", alias = "L")]
    L,
    #[serde(rename = "Perempuan", alias = "P")]
    P,
}

impl Gender {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "L" | "Laki-laki" => Some(Self::L),
            "P" | "Perempuan" => Some(Self::P),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Hadir,
    Izin,
    Sakit,
    Alpha,
}

impl AttendanceStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Hadir" => Some(Self::Hadir),
            "Izin" => Some(Self::Izin),
            "Sakit" => Some(Self::Sakit),
            "Alpha" => Some(Self::Alpha),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermitType {
    Sakit,
    Izin,
    #[serde(rename = "Keperluan Keluarga")]
    KeperluanKeluarga,
}

impl PermitType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Sakit" => Some(Self::Sakit),
            "Izin" => Some(Self::Izin),
            "Keperluan Keluarga" => Some(Self::KeperluanKeluarga),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitReason {
    Absensi,
    Akademik,
    Perilaku,
    Ekonomi,
    Lainnya,
}

impl VisitReason {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Absensi" => Some(Self::Absensi),
            "Akademik" => Some(Self::Akademik),
            "Perilaku" => Some(Self::Perilaku),
            "Ekonomi" => Some(Self::Ekonomi),
            "Lainnya" => Some(Self::Lainnya),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub nisn: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub gender: Gender,
    pub address: String,
    pub parent_name: String,
    pub parent_phone: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub date: String,
    pub student_id: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permit {
    pub id: String,
    pub student_id: String,
    #[serde(rename = "type")]
    pub kind: PermitType,
    pub start_date: String,
    pub end_date: String,
    pub reason: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub student_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub date: String,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeVisit {
    pub id: String,
    pub student_id: String,
    pub date: String,
    pub reason: VisitReason,
    pub findings: String,
    pub follow_up: String,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    pub name: String,
    pub nip: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub academic_year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_url: Option<String>,
}

impl Default for TeacherProfile {
    fn default() -> Self {
        Self {
            name: "Bapak/Ibu Wali Kelas".to_string(),
            nip: "19850101 201001 1 001".to_string(),
            class_name: DEFAULT_CLASS.to_string(),
            academic_year: "2023/2024".to_string(),
            signature_url: None,
        }
    }
}

pub const DEFAULT_CLASS: &str = "XII RPL 1";

/// One of the six top-level state slots, each persisted under its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Students,
    Attendance,
    Permits,
    Payments,
    Visits,
    Profile,
}

impl Slot {
    pub const ALL: [Slot; 6] = [
        Slot::Students,
        Slot::Attendance,
        Slot::Permits,
        Slot::Payments,
        Slot::Visits,
        Slot::Profile,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "students" => Some(Self::Students),
            "attendance" => Some(Self::Attendance),
            "permits" => Some(Self::Permits),
            "payments" => Some(Self::Payments),
            "visits" => Some(Self::Visits),
            "profile" => Some(Self::Profile),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Attendance => "attendance",
            Self::Permits => "permits",
            Self::Payments => "payments",
            Self::Visits => "visits",
            Self::Profile => "profile",
        }
    }

    /// Durable storage key for the slot.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Students => "kc_students",
            Self::Attendance => "kc_attendance",
            Self::Permits => "kc_permits",
            Self::Payments => "kc_payments",
            Self::Visits => "kc_visits",
            Self::Profile => "kc_profile",
        }
    }
}

/// Roster used when no student data has been stored yet (or it is unreadable).
pub fn seed_students() -> Vec<Student> {
    let seed = |id: &str, nisn: &str, name: &str, gender: Gender, address: &str, parent: &str, phone: &str| {
        Student {
            id: id.to_string(),
            nisn: nisn.to_string(),
            name: name.to_string(),
            class_name: DEFAULT_CLASS.to_string(),
            gender,
            address: address.to_string(),
            parent_name: parent.to_string(),
            parent_phone: phone.to_string(),
            is_active: true,
            photo_url: Some(format!("https://picsum.photos/seed/{}/200", id)),
        }
    };
    vec![
        seed(
            "1",
            "0012345678",
            "Ahmad Faisal",
            Gender::L,
            "Jl. Merdeka No. 10, Jakarta",
            "Sutrisno",
            "081234567890",
        ),
        seed(
            "2",
            "0023456789",
            "Siti Aminah",
            Gender::P,
            "Jl. Melati No. 5, Jakarta",
            "Budi",
            "081234567891",
        ),
        seed(
            "3",
            "0034567890",
            "Budi Santoso",
            Gender::L,
            "Jl. Mawar No. 8, Jakarta",
            "Agus",
            "081234567892",
        ),
    ]
}
