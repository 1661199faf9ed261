use crate::model::{Filter, Kiosk};
use crate::normalize::{digits, normalize};

/// Whether `kiosk` passes both the keyword and the line rule of `filter`.
pub fn matches(kiosk: &Kiosk, filter: &Filter) -> bool {
    matches_keyword(kiosk, &filter.keyword) && matches_line(kiosk, &filter.line)
}

/// Station name or detail location against a free-text keyword.
///
/// Containment is checked both ways on the station name so that a longer
/// query ("강남역2호선") still finds the shorter canonical name ("강남").
pub fn matches_keyword(kiosk: &Kiosk, keyword: &str) -> bool {
    let keyword = normalize(keyword);
    if keyword.is_empty() {
        return true;
    }

    let station = normalize(&kiosk.station_name);
    let detail = normalize(kiosk.detail());

    station.contains(&keyword)
        || keyword.contains(&station)
        || (!detail.is_empty() && detail.contains(&keyword))
}

/// Line designation against a line filter; a bare number matches "N호선".
pub fn matches_line(kiosk: &Kiosk, line: &str) -> bool {
    let wanted = line.trim().to_lowercase();
    if wanted.is_empty() {
        return true;
    }

    let actual = kiosk.line.trim().to_lowercase();
    if actual.contains(&wanted) {
        return true;
    }

    let actual_digits = digits(&actual);
    !actual_digits.is_empty() && actual_digits == digits(&wanted)
}

/// Kiosks passing `filter`, in input order.
pub fn apply<'a>(kiosks: &'a [Kiosk], filter: &Filter) -> Vec<&'a Kiosk> {
    kiosks.iter().filter(|k| matches(k, filter)).collect()
}
