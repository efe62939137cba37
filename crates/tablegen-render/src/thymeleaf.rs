use tablegen_core::ColumnDescriptor;

use crate::{is_money_column, write_head};

/// Table bound to a `rows` model attribute with `th:each`.
///
/// Money columns are right-aligned and formatted with thousands separators.
pub(crate) fn render(columns: &[ColumnDescriptor]) -> String {
    let mut out = String::new();
    write_head(&mut out, columns);

    out.push_str("  <tbody>\n");
    out.push_str("    <tr th:each=\"row : ${rows}\">\n");
    for column in columns {
        let name = &column.name;
        if is_money_column(name) {
            out.push_str(&format!(
                "      <td class=\"text-end\" \
                 th:text=\"${{#numbers.formatInteger(row.{name}, 0, 'COMMA')}}\"></td>\n"
            ));
        } else {
            out.push_str(&format!("      <td th:text=\"${{row.{name}}}\"></td>\n"));
        }
    }
    out.push_str("    </tr>\n");
    out.push_str("  </tbody>\n");
    out.push_str("</table>");
    out
}
