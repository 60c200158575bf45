//! Export renderings of already-fetched data: order spreadsheets, order CSV,
//! inventory spreadsheets, and the text of the shared order message.

use crate::cutting_order::status_label;
use crate::fabric::{category_label, pattern_label, round_meters};
use crate::spreadsheet::{Cell, Sheet, Workbook};
use crate::types::Date;

/// Flattened view of one order, ready to render.
#[derive(Debug, Clone)]
pub struct OrderExport {
    pub lot_number: String,
    pub client_name: String,
    pub status: String,
    pub creation_date: Date,
    pub notes: Option<String>,
    pub lines: Vec<LineExport>,
    pub garments: Vec<GarmentExport>,
}

#[derive(Debug, Clone)]
pub struct LineExport {
    pub article: String,
    pub color: String,
    pub category: String,
    pub description: String,
    pub meters: f64,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GarmentExport {
    pub name: String,
    /// `(size label, quantity)` in display order.
    pub sizes: Vec<(String, i32)>,
}

/// One inventory row for the fabric spreadsheet.
#[derive(Debug, Clone)]
pub struct InventoryExport {
    pub article: String,
    pub color: String,
    pub description: String,
    pub meters: f64,
    pub category: String,
    pub pattern: String,
    pub shipping_date: Date,
    pub client_name: Option<String>,
}

impl OrderExport {
    pub fn total_meters(&self) -> f64 {
        round_meters(self.lines.iter().map(|l| l.meters).sum())
    }

    /// Union of all size labels, in first-seen order.
    pub fn size_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for garment in &self.garments {
            for (size, _) in &garment.sizes {
                if !columns.iter().any(|c| c == size) {
                    columns.push(size.clone());
                }
            }
        }
        columns
    }

    /// Download file name, e.g. `orden_OC260116042.xlsx`.
    pub fn file_name(&self, extension: &str) -> String {
        let safe: String = self
            .lot_number
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("orden_{safe}.{extension}")
    }
}

/// Build the order workbook: a header block, the lines table and the
/// garment × size grid with row totals.
pub fn order_workbook(order: &OrderExport) -> Workbook {
    let mut sheet = Sheet::new(&format!("Orden {}", order.lot_number));

    sheet.push_row(["Orden de corte", order.lot_number.as_str()]);
    sheet.push_row(["Cliente", order.client_name.as_str()]);
    sheet.push_row(["Estado", status_label(&order.status)]);
    sheet.push_row([
        Cell::from("Fecha"),
        Cell::from(order.creation_date.format("%d/%m/%Y").to_string()),
    ]);
    sheet.push_row([Cell::from("Notas"), Cell::from(order.notes.as_deref())]);
    sheet.blank_row();

    sheet.push_row([
        "Artículo",
        "Color",
        "Tipo",
        "Descripción",
        "Metros a cortar",
        "Observaciones",
    ]);
    for line in &order.lines {
        sheet.push_row([
            Cell::from(line.article.as_str()),
            Cell::from(line.color.as_str()),
            Cell::from(category_label(&line.category)),
            Cell::from(line.description.as_str()),
            Cell::from(line.meters),
            Cell::from(line.remarks.as_deref()),
        ]);
    }
    sheet.push_row([
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
        Cell::from("Total"),
        Cell::from(order.total_meters()),
    ]);

    if !order.garments.is_empty() {
        let sizes = order.size_columns();
        sheet.blank_row();

        let mut header = vec![Cell::from("Prenda")];
        header.extend(sizes.iter().map(|s| Cell::from(s.as_str())));
        header.push(Cell::from("Total"));
        sheet.push_row(header);

        let mut column_totals = vec![0i64; sizes.len()];
        for garment in &order.garments {
            let mut row = vec![Cell::from(garment.name.as_str())];
            let mut row_total = 0i64;
            for (i, size) in sizes.iter().enumerate() {
                match garment.sizes.iter().find(|(s, _)| s == size) {
                    Some((_, qty)) => {
                        row.push(Cell::from(i64::from(*qty)));
                        row_total += i64::from(*qty);
                        column_totals[i] += i64::from(*qty);
                    }
                    None => row.push(Cell::Empty),
                }
            }
            row.push(Cell::from(row_total));
            sheet.push_row(row);
        }

        let mut totals = vec![Cell::from("Total")];
        totals.extend(column_totals.iter().map(|t| Cell::from(*t)));
        totals.push(Cell::from(column_totals.iter().sum::<i64>()));
        sheet.push_row(totals);
    }

    Workbook::with_sheet(sheet)
}

/// Build the inventory workbook for the active fabrics.
pub fn inventory_workbook(rows: &[InventoryExport]) -> Workbook {
    let mut sheet = Sheet::new("Inventario de Telas");
    sheet.push_row([
        "Artículo",
        "Color",
        "Descripción",
        "Metros",
        "Tipo",
        "Patrón",
        "Fecha de envío",
        "Cliente",
    ]);
    for row in rows {
        sheet.push_row([
            Cell::from(row.article.as_str()),
            Cell::from(row.color.as_str()),
            Cell::from(row.description.as_str()),
            Cell::from(row.meters),
            Cell::from(category_label(&row.category)),
            Cell::from(pattern_label(&row.pattern)),
            Cell::from(row.shipping_date.format("%d/%m/%Y").to_string()),
            Cell::from(row.client_name.as_deref()),
        ]);
    }
    Workbook::with_sheet(sheet)
}

/// Lines of an order as CSV (header + one row per line).
pub fn order_lines_csv(order: &OrderExport) -> String {
    let mut lines = Vec::with_capacity(order.lines.len() + 1);
    lines.push("lot_number,article,color,category,description,meters,remarks".to_string());
    for line in &order.lines {
        lines.push(
            [
                csv_escape(&order.lot_number),
                csv_escape(&line.article),
                csv_escape(&line.color),
                csv_escape(&line.category),
                csv_escape(&line.description),
                line.meters.to_string(),
                csv_escape(line.remarks.as_deref().unwrap_or("")),
            ]
            .join(","),
        );
    }
    lines.join("\n")
}

/// Quote a CSV field when it contains a comma, quote or line break.
pub fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Plain-text order summary sent through the messaging deep link.
pub fn order_message(order: &OrderExport) -> String {
    let mut msg = format!(
        "Orden de corte {}\nCliente: {}\nEstado: {}\nFecha: {}\n",
        order.lot_number,
        order.client_name,
        status_label(&order.status),
        order.creation_date.format("%d/%m/%Y"),
    );

    msg.push_str("\nTelas:\n");
    for line in &order.lines {
        msg.push_str(&format!("- {} - {}: {} m", line.article, line.color, line.meters));
        if let Some(remarks) = line.remarks.as_deref().filter(|r| !r.trim().is_empty()) {
            msg.push_str(&format!(" ({remarks})"));
        }
        msg.push('\n');
    }
    msg.push_str(&format!("Total: {} m\n", order.total_meters()));

    if !order.garments.is_empty() {
        msg.push_str("\nPrendas:\n");
        for garment in &order.garments {
            let sizes: Vec<String> = garment
                .sizes
                .iter()
                .map(|(size, qty)| format!("{size}: {qty}"))
                .collect();
            if sizes.is_empty() {
                msg.push_str(&format!("- {}\n", garment.name));
            } else {
                msg.push_str(&format!("- {} ({})\n", garment.name, sizes.join(", ")));
            }
        }
    }

    if let Some(notes) = order.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        msg.push_str(&format!("\nNotas: {notes}\n"));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrderExport {
        OrderExport {
            lot_number: "OC260116042".into(),
            client_name: "Textil Norte".into(),
            status: "in_process".into(),
            creation_date: Date::from_ymd_opt(2026, 1, 16).unwrap(),
            notes: Some("Entregar el lunes".into()),
            lines: vec![
                LineExport {
                    article: "GAB-200".into(),
                    color: "Negro".into(),
                    category: "fabric".into(),
                    description: "Gabardina, elastizada".into(),
                    meters: 12.5,
                    remarks: Some("doble ancho".into()),
                },
                LineExport {
                    article: "FOR-10".into(),
                    color: "Beige".into(),
                    category: "lining".into(),
                    description: "Forro".into(),
                    meters: 4.0,
                    remarks: None,
                },
            ],
            garments: vec![
                GarmentExport {
                    name: "Saco".into(),
                    sizes: vec![("S".into(), 3), ("M".into(), 5)],
                },
                GarmentExport {
                    name: "Pantalón".into(),
                    sizes: vec![("M".into(), 2), ("L".into(), 1)],
                },
            ],
        }
    }

    #[test]
    fn size_columns_keep_first_seen_order() {
        assert_eq!(sample().size_columns(), vec!["S", "M", "L"]);
    }

    #[test]
    fn workbook_grid_has_row_and_column_totals() {
        let workbook = order_workbook(&sample());
        let rows = &workbook.sheets[0].rows;

        let saco = rows
            .iter()
            .find(|r| r.first() == Some(&Cell::from("Saco")))
            .unwrap();
        assert_eq!(
            saco,
            &vec![
                Cell::from("Saco"),
                Cell::Number(3.0),
                Cell::Number(5.0),
                Cell::Empty,
                Cell::Number(8.0)
            ]
        );

        let totals = rows.last().unwrap();
        assert_eq!(totals[0], Cell::from("Total"));
        assert_eq!(totals[4], Cell::Number(11.0));
    }

    #[test]
    fn workbook_header_uses_status_label() {
        let workbook = order_workbook(&sample());
        assert_eq!(
            workbook.sheets[0].rows[2],
            vec![Cell::from("Estado"), Cell::from("En Proceso")]
        );
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        let csv = order_lines_csv(&sample());
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[1],
            "OC260116042,GAB-200,Negro,fabric,\"Gabardina, elastizada\",12.5,doble ancho"
        );
        assert!(rows[2].ends_with(",4,"));
    }

    #[test]
    fn message_lists_lines_garments_and_notes() {
        let msg = order_message(&sample());
        assert!(msg.starts_with("Orden de corte OC260116042\n"));
        assert!(msg.contains("- GAB-200 - Negro: 12.5 m (doble ancho)\n"));
        assert!(msg.contains("Total: 16.5 m\n"));
        assert!(msg.contains("- Saco (S: 3, M: 5)\n"));
        assert!(msg.contains("Notas: Entregar el lunes"));
    }

    #[test]
    fn file_name_is_filesystem_safe() {
        let mut order = sample();
        order.lot_number = "OC 1/2".into();
        assert_eq!(order.file_name("xlsx"), "orden_OC_1_2.xlsx");
    }
}
