/// Integer currency rendering with locale grouping.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyFormat {
    pub symbol: &'static str,
    pub group_separator: char,
}

/// Colombian pesos as the `es-CO` locale prints them, without decimals.
pub const COP: CurrencyFormat = CurrencyFormat {
    symbol: "$",
    group_separator: '.',
};

impl CurrencyFormat {
    pub fn format(&self, value: f64) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        let rounded = value.round();
        let sign = if rounded < 0.0 { "-" } else { "" };
        let digits = format!("{:.0}", rounded.abs());
        format!("{sign}{} {}", self.symbol, self.group(&digits))
    }

    fn group(&self, digits: &str) -> String {
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (index, digit) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push(self.group_separator);
            }
            grouped.push(digit);
        }
        grouped
    }
}

pub fn format_cop(value: f64) -> String {
    COP.format(value)
}
