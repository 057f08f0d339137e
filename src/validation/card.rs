/// Payment card numbers must be 12-19 digits (spaces and dashes tolerated as
/// separators) and satisfy the Luhn checksum.
pub fn is_valid_card_number(raw: &str) -> bool {
    let digits: Option<Vec<u32>> = raw
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .map(|c| c.to_digit(10))
        .collect();

    let digits = match digits {
        Some(digits) => digits,
        None => return false,
    };

    if digits.len() < 12 || digits.len() > 19 {
        return false;
    }

    passes_luhn(&digits)
}

// https://en.wikipedia.org/wiki/Luhn_algorithm -- double every second digit
// from the right, subtract 9 from anything over 9, sum must be divisible by 10
fn passes_luhn(digits: &[u32]) -> bool {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(position, digit)| {
            if position % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                *digit
            }
        })
        .sum();

    sum % 10 == 0
}
