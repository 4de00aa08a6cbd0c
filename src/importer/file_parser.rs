// ==========================================
// GSTR-1 汇总工具 - 文件解析器实现
// ==========================================
// 支持: CSV (.csv) / 电子表格 (.xlsx/.xls/.xlsm/.ods，读取第一张表)
// 资源: 文件句柄在解析函数返回时释放（包括出错路径）
// ==========================================

use crate::domain::dataset::{RawDataset, RawRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "xlsb", "ods"];

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 从任意读取器解析 CSV（上传内容已在内存中时使用）
    pub fn parse_reader<R: Read>(&self, reader: R) -> ImportResult<RawDataset> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(reader);

        // 读取表头（去除 UTF-8 BOM）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::MissingHeader);
        }

        let mut dataset = RawDataset::new(headers);
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let values: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();
            let raw = RawRecord::new(row_idx + 2, values);

            // 跳过完全空白的行
            if raw.is_blank() {
                continue;
            }
            dataset.push(raw);
        }

        Ok(dataset)
    }
}

impl FileParser for CsvParser {
    fn parse_dataset(&self, file_path: &Path) -> ImportResult<RawDataset> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let dataset = self.parse_reader(file)?;
        debug!(path = %file_path.display(), rows = dataset.len(), "CSV 解析完成");
        Ok(dataset)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_dataset(&self, file_path: &Path) -> ImportResult<RawDataset> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if !SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开工作簿（按扩展名自动选择格式）
        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(ImportError::NoWorksheet)?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows.next().ok_or(ImportError::MissingHeader)?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut dataset = RawDataset::new(headers);
        for (row_idx, data_row) in rows.enumerate() {
            let values: Vec<String> = data_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect();
            let raw = RawRecord::new(row_idx + 2, values);

            // 跳过完全空白的行
            if raw.is_blank() {
                continue;
            }
            dataset.push(raw);
        }

        debug!(
            path = %file_path.display(),
            sheet = %sheet_name,
            rows = dataset.len(),
            "电子表格解析完成"
        );
        Ok(dataset)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_dataset(&self, file_path: &Path) -> ImportResult<RawDataset> {
        let ext = extension_of(file_path);
        match ext.as_str() {
            "csv" => CsvParser.parse_dataset(file_path),
            e if SPREADSHEET_EXTENSIONS.contains(&e) => ExcelParser.parse_dataset(file_path),
            _ => {
                ensure_exists(file_path)?;
                Err(ImportError::UnsupportedFormat(ext))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let temp_file = temp_csv(&["Ship To State,Total Tax Amount", "HARYANA,18", "Delhi , 5"]);

        let dataset = CsvParser.parse_dataset(temp_file.path()).unwrap();

        assert_eq!(dataset.headers(), &["Ship To State", "Total Tax Amount"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[1].get(0), Some("Delhi"));
        assert_eq!(dataset.records()[1].get(1), Some("5"));
    }

    #[test]
    fn test_csv_parser_strips_bom() {
        let dataset = CsvParser
            .parse_reader("\u{feff}Order Total,State\n118,Haryana\n".as_bytes())
            .unwrap();
        assert_eq!(dataset.headers()[0], "Order Total");
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_dataset(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let temp_file = temp_csv(&["State,Order Total", "Haryana,118", ",", "Delhi,236"]);

        let dataset = CsvParser.parse_dataset(temp_file.path()).unwrap();

        // 应跳过空行，行号保持源文件位置
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[1].row_number(), 4);
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let temp_file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = UniversalFileParser.parse_dataset(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"));
    }
}
