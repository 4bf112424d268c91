//! Text rendering of the directory state.

use std::fmt::Write;

use chrono::{Local, TimeZone};

use crate::managers::directory_manager::DirectoryManager;
use crate::services::default_directory::default_count;
use crate::types::directory::{Notice, NoticeLevel};
use crate::types::history::SearchHistoryItem;

const TITLE: &str = "สมุดโทรศัพท์ภายใน";
const RULE: &str = "───────────────────────────────────────────────────────────────";

/// Renders the full screen: banner, header, grouped list, then any open modal.
pub fn render(dir: &DirectoryManager) -> String {
    let mut out = String::new();
    let flags = dir.flags();

    if dir.show_seed_banner() {
        let _ = writeln!(
            out,
            "⚠  ฐานข้อมูลว่างเปล่า ต้องการนำเข้าข้อมูลเบอร์โทรพื้นฐานหรือไม่? ({} รายการ) พิมพ์ `seed`",
            default_count()
        );
    }

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  {}", TITLE);
    if dir.search_term().is_empty() {
        let _ = writeln!(out, "  ทั้งหมด {} รายการ", dir.result_count());
    } else {
        let _ = writeln!(
            out,
            "  ค้นหา \"{}\" พบ {} รายการ",
            dir.search_term(),
            dir.result_count()
        );
    }
    if flags.loading {
        let _ = writeln!(out, "  … กำลังโหลดข้อมูล");
    }
    if flags.syncing {
        let _ = writeln!(out, "  … กำลังนำเข้าข้อมูล กรุณารอสักครู่");
    }
    let _ = writeln!(out, "{}", RULE);

    let groups = dir.grouped_entries();
    if groups.is_empty() {
        let _ = writeln!(out, "  ไม่พบข้อมูล");
    }
    for group in &groups {
        let _ = writeln!(out, "■ {} ({} แผนก)", group.building, group.entries.len());
        for entry in &group.entries {
            let _ = writeln!(
                out,
                "    [{}] {}  ☎ {}",
                entry.id,
                entry.department_label(),
                entry.number_label()
            );
        }
    }

    if let Some(form) = dir.form() {
        let title = if form.editing_id.is_some() {
            "แก้ไขข้อมูล"
        } else {
            "เพิ่มเบอร์โทรใหม่"
        };
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "  {}", title);
        let building_mode = if form.custom_building { "พิมพ์เอง" } else { "เลือกจากรายการ" };
        let _ = writeln!(out, "    อาคาร ({}): {}", building_mode, form.draft.building);
        if !form.custom_building {
            let _ = writeln!(out, "      ตัวเลือก: {}", dir.distinct_buildings().join(" | "));
        }
        let _ = writeln!(out, "    แผนก: {}", form.draft.department);
        let _ = writeln!(out, "    เบอร์โทร: {}", form.draft.number);
        if flags.saving {
            let _ = writeln!(out, "    … กำลังบันทึก");
        }
    }

    if let Some(id) = dir.pending_delete() {
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "  ยืนยันลบข้อมูล [{}]? (yes / no)", id);
    }

    if dir.is_history_open() {
        let _ = writeln!(out, "{}", RULE);
        out.push_str(&render_history(dir.history_items()));
    }

    out
}

/// Numbered history list, newest first.
pub fn render_history(items: &[SearchHistoryItem]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  ประวัติการค้นหา");
    if items.is_empty() {
        let _ = writeln!(out, "    ยังไม่มีประวัติการค้นหา");
        return out;
    }
    for (i, item) in items.iter().enumerate() {
        let when = Local
            .timestamp_millis_opt(item.timestamp)
            .single()
            .map(|t| t.format("%d/%m/%Y %H:%M").to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "    {:>2}. {}  ({} รายการ, {})",
            i + 1,
            item.term,
            item.result_count,
            when
        );
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Info => format!("ℹ  {}", notice.message),
        NoticeLevel::Error => format!("✖  {}", notice.message),
    }
}
