//! Terminal command parsing.
//!
//! Each typed line becomes an RPC method call; a few commands need local
//! state to resolve (history picks by position) and are returned as-is.

use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Call { method: &'static str, params: Value },
    /// 1-based position in the history list.
    PickHistory(usize),
    Help,
    Quit,
    Unknown(String),
}

fn call(method: &'static str, params: Value) -> ShellCommand {
    ShellCommand::Call { method, params }
}

pub const HELP: &str = "\
คำสั่ง:
  s <คำค้น>         ค้นหา (s อย่างเดียว = ล้างคำค้น)
  r                 โหลดข้อมูลใหม่
  seed [yes]        นำเข้าข้อมูลพื้นฐาน
  add | edit <id>   เปิดฟอร์มเพิ่ม/แก้ไข
  b|d|n <ค่า>       กรอกอาคาร / แผนก / เบอร์โทร
  custom on|off     พิมพ์ชื่ออาคารเอง / เลือกจากรายการ
  save | close      บันทึก / ปิดฟอร์ม
  del [id]          ลบข้อมูล (ไม่ระบุ id = รายการที่กำลังแก้ไข, ตามด้วย yes / no)
  h | pick <n>      ดูประวัติ / ค้นหาซ้ำจากประวัติ
  hclose | hclear   ปิด / ล้างประวัติ
  export [dir]      ส่งออก CSV
  q                 ออก";

/// Parses one input line.
pub fn parse_command(line: &str) -> ShellCommand {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb {
        "s" | "search" if rest.is_empty() => call("search.reset", json!({})),
        "s" | "search" => call("search.set", json!({"term": rest})),
        "r" | "reload" => call("directory.refresh", json!({})),
        "seed" => call("directory.seed", json!({"confirm": rest == "yes"})),
        "add" => call("form.open_add", json!({})),
        "edit" if !rest.is_empty() => call("form.open_edit", json!({"id": rest})),
        "b" => call("form.set", json!({"field": "building", "value": rest})),
        "d" => call("form.set", json!({"field": "department", "value": rest})),
        "n" => call("form.set", json!({"field": "number", "value": rest})),
        "custom" => match rest {
            "on" => call("form.custom_building", json!({"enabled": true})),
            "off" => call("form.custom_building", json!({"enabled": false})),
            _ => ShellCommand::Unknown(line.to_string()),
        },
        "save" => call("form.submit", json!({})),
        "close" => call("form.close", json!({})),
        "del" if rest.is_empty() => call("form.delete", json!({})),
        "del" => call("delete.request", json!({"id": rest})),
        "yes" => call("delete.confirm", json!({})),
        "no" => call("delete.cancel", json!({})),
        "h" | "history" => call("history.open", json!({})),
        "hclose" => call("history.close", json!({})),
        "hclear" => call("history.clear", json!({})),
        "pick" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => ShellCommand::PickHistory(n),
            _ => ShellCommand::Unknown(line.to_string()),
        },
        "export" if rest.is_empty() => call("export.csv", json!({})),
        "export" => call("export.csv", json!({"directory": rest})),
        "help" | "?" => ShellCommand::Help,
        "q" | "quit" | "exit" => ShellCommand::Quit,
        _ => ShellCommand::Unknown(line.to_string()),
    }
}
