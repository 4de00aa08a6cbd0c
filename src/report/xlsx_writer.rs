// ==========================================
// GSTR-1 汇总工具 - XLSX 渲染器
// ==========================================
// 职责: ReportWorkbook → .xlsx 字节流（格式 / 列宽 / 签名行 / 工作表保护）
// 红线: 只读工作簿模型；失败时不返回部分结果
// ==========================================

use crate::config::WorkbookSettings;
use crate::report::error::{ReportError, ReportResult};
use crate::report::sheet::{CellValue, ReportWorkbook, SheetData, SheetKind};
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, ProtectionOptions, Workbook, Worksheet,
};
use tracing::debug;

// ==========================================
// ReportEmitter Trait
// ==========================================
// 用途: 工作簿模型 → 输出产物
// 实现者: XlsxEmitter
pub trait ReportEmitter: Send + Sync {
    /// 渲染工作簿
    ///
    /// # 返回
    /// - Ok(Vec<u8>): 完整的输出文件内容
    /// - Err(ReportError): 渲染失败
    fn emit(&self, workbook: &ReportWorkbook) -> ReportResult<Vec<u8>>;
}

/// 单元格格式集合
struct SheetFormats {
    header: Format,
    text: Format,
    money: Format,
    signature: Format,
}

impl SheetFormats {
    fn for_kind(kind: SheetKind) -> Self {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_unlocked();
        let header = match kind {
            SheetKind::Bucket => header
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(0x0070C0)),
            SheetKind::Identity => header
                .set_font_color(Color::Black)
                .set_background_color(Color::RGB(0xFFE6CC)),
        };

        Self {
            header,
            text: Format::new().set_unlocked(),
            money: Format::new().set_num_format("#,##0.00").set_unlocked(),
            signature: Format::new()
                .set_italic()
                .set_font_size(9)
                .set_font_color(Color::RGB(0x646464))
                .set_align(FormatAlign::Right)
                .set_locked(),
        }
    }
}

// ==========================================
// XlsxEmitter - XLSX 渲染器
// ==========================================
pub struct XlsxEmitter {
    settings: WorkbookSettings,
}

impl XlsxEmitter {
    pub fn new(settings: WorkbookSettings) -> Self {
        Self { settings }
    }

    fn write_sheet(&self, worksheet: &mut Worksheet, sheet: &SheetData) -> ReportResult<()> {
        let formats = SheetFormats::for_kind(sheet.kind);
        let (money_from, money_to) = sheet.kind.money_columns();
        let is_money = |col: usize| !sheet.rows.is_empty() && (money_from..=money_to).contains(&col);

        worksheet.set_name(&sheet.name)?;

        // 1. 列宽与列格式（全表默认解锁）
        for (col, width) in sheet.column_widths().into_iter().enumerate() {
            let col = col as u16;
            let format = if is_money(col as usize) {
                &formats.money
            } else {
                &formats.text
            };
            worksheet.set_column_width(col, width as f64)?;
            worksheet.set_column_format(col, format)?;
        }

        // 2. 表头
        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &formats.header)?;
        }

        // 3. 数据行
        for (idx, row) in sheet.rows.iter().enumerate() {
            let row_num = (idx + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let format = if is_money(col) {
                    &formats.money
                } else {
                    &formats.text
                };
                match cell {
                    CellValue::Text(text) => {
                        worksheet.write_string_with_format(row_num, col as u16, text, format)?;
                    }
                    CellValue::Number(value) => {
                        worksheet.write_number_with_format(row_num, col as u16, *value, format)?;
                    }
                }
            }
        }

        // 4. 签名行：数据区下方隔两行
        let signature_row = (sheet.rows.len() + 3) as u32;
        worksheet.write_string_with_format(
            signature_row,
            sheet.kind.signature_column() as u16,
            &self.settings.signature,
            &formats.signature,
        )?;

        // 5. 工作表保护
        let mut options = ProtectionOptions::new();
        options.use_autofilter = true;
        options.sort = true;
        options.format_cells = true;
        options.format_columns = true;
        options.format_rows = true;
        options.insert_rows = true;
        options.delete_rows = true;
        options.edit_objects = true;
        options.edit_scenarios = true;
        if let Some(password) = self.settings.sheet_password.as_deref() {
            worksheet.protect_with_password(password);
        }
        worksheet.protect_with_options(&options);

        Ok(())
    }
}

impl ReportEmitter for XlsxEmitter {
    fn emit(&self, report: &ReportWorkbook) -> ReportResult<Vec<u8>> {
        if report.is_empty() {
            return Err(ReportError::EmptyWorkbook);
        }

        let mut workbook = Workbook::new();
        for sheet in &report.sheets {
            let worksheet = workbook.add_worksheet();
            self.write_sheet(worksheet, sheet)?;
        }

        let bytes = workbook.save_to_buffer()?;
        debug!(sheets = report.len(), bytes = bytes.len(), "工作簿渲染完成");
        Ok(bytes)
    }
}
