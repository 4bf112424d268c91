//! Bundled default directory.
//!
//! Shown before the first fetch completes, shown again when the remote
//! collection turns out to be empty, and used as the payload when seeding
//! that empty collection. Entries carry no `created_at`.

use crate::types::directory::PhoneEntry;

/// (id, building, department, number)
const DEFAULT_ROWS: &[(&str, &str, &str, &str)] = &[
    ("1", "อาคารอุบัติเหตุและฉุกเฉิน", "ห้องฉุกเฉิน (ER)", "1101/1102"),
    ("2", "อาคารอุบัติเหตุและฉุกเฉิน", "ศูนย์รับแจ้งเหตุและสั่งการ", "1669"),
    ("3", "อาคารอุบัติเหตุและฉุกเฉิน", "ห้องผ่าตัดเล็ก", "1105"),
    ("4", "อาคารอุบัติเหตุและฉุกเฉิน", "จุดคัดกรอง", "1110"),
    ("5", "อาคารผู้ป่วยนอก", "เวชระเบียน", "1201/1202"),
    ("6", "อาคารผู้ป่วยนอก", "ห้องบัตร", "1203"),
    ("7", "อาคารผู้ป่วยนอก", "OPD อายุรกรรม", "1210"),
    ("8", "อาคารผู้ป่วยนอก", "OPD ศัลยกรรม", "1211"),
    ("9", "อาคารผู้ป่วยนอก", "OPD กุมารเวชกรรม", "1212"),
    ("10", "อาคารผู้ป่วยนอก", "OPD สูติ-นรีเวช", "1213"),
    ("11", "อาคารผู้ป่วยนอก", "OPD ตา", "1214"),
    ("12", "อาคารผู้ป่วยนอก", "OPD หู คอ จมูก", "1215"),
    ("13", "อาคารผู้ป่วยนอก", "ห้องจ่ายยาผู้ป่วยนอก", "1220/1221"),
    ("14", "อาคารผู้ป่วยนอก", "การเงินผู้ป่วยนอก", "1225"),
    ("15", "อาคารผู้ป่วยใน", "หอผู้ป่วยอายุรกรรมชาย", "1301"),
    ("16", "อาคารผู้ป่วยใน", "หอผู้ป่วยอายุรกรรมหญิง", "1302"),
    ("17", "อาคารผู้ป่วยใน", "หอผู้ป่วยศัลยกรรมชาย", "1303"),
    ("18", "อาคารผู้ป่วยใน", "หอผู้ป่วยศัลยกรรมหญิง", "1304"),
    ("19", "อาคารผู้ป่วยใน", "หอผู้ป่วยกุมารเวชกรรม", "1305"),
    ("20", "อาคารผู้ป่วยใน", "หอผู้ป่วยหนัก (ICU)", "1310/1311"),
    ("21", "อาคารผู้ป่วยใน", "หอผู้ป่วยหนักทารกแรกเกิด (NICU)", "1312"),
    ("22", "อาคารผู้ป่วยใน", "ห้องคลอด", "1320"),
    ("23", "อาคารผ่าตัด", "ห้องผ่าตัดใหญ่", "1401/1402"),
    ("24", "อาคารผ่าตัด", "วิสัญญี", "1405"),
    ("25", "อาคารผ่าตัด", "หน่วยจ่ายกลาง (CSSD)", "1410"),
    ("26", "อาคารบริการทางการแพทย์", "ห้องปฏิบัติการ (Lab)", "1501/1502"),
    ("27", "อาคารบริการทางการแพทย์", "ธนาคารเลือด", "1505"),
    ("28", "อาคารบริการทางการแพทย์", "รังสีวิทยา (X-Ray)", "1510"),
    ("29", "อาคารบริการทางการแพทย์", "กายภาพบำบัด", "1520"),
    ("30", "อาคารบริการทางการแพทย์", "ไตเทียม", "1530"),
    ("31", "อาคารอำนวยการ", "ผู้อำนวยการ", "1001"),
    ("32", "อาคารอำนวยการ", "ฝ่ายบริหารทั่วไป", "1005"),
    ("33", "อาคารอำนวยการ", "งานการเจ้าหน้าที่", "1010"),
    ("34", "อาคารอำนวยการ", "งานพัสดุ", "1015"),
    ("35", "อาคารอำนวยการ", "ศูนย์คอมพิวเตอร์", "1020/1021"),
    ("36", "อาคารสนับสนุน", "โภชนาการ", "1601"),
    ("37", "อาคารสนับสนุน", "ซักฟอก", "1605"),
    ("38", "อาคารสนับสนุน", "ซ่อมบำรุง", "1610"),
    ("39", "อาคารสนับสนุน", "ยานพาหนะ", "1615"),
    ("40", "อาคารสนับสนุน", "รักษาความปลอดภัย", "1620"),
    ("41", "", "ประชาสัมพันธ์", "0"),
];

/// Returns a fresh copy of the bundled directory.
pub fn default_entries() -> Vec<PhoneEntry> {
    DEFAULT_ROWS
        .iter()
        .map(|(id, building, department, number)| PhoneEntry {
            id: id.to_string(),
            building: building.to_string(),
            department: department.to_string(),
            number: number.to_string(),
            created_at: None,
        })
        .collect()
}

/// Number of bundled entries, as announced in the seed confirmation.
pub fn default_count() -> usize {
    DEFAULT_ROWS.len()
}
