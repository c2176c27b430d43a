use crate::domain::model::StationRecord;
use crate::utils::error::{ExplorerError, Result};

const fn station(
    local_code: &'static str,
    serial: &'static str,
    nearest_reference_station_code: &'static str,
    display_label: &'static str,
) -> StationRecord {
    StationRecord {
        local_code,
        serial,
        nearest_reference_station_code,
        display_label,
    }
}

/// School seismometers of network `S`, with the closest `CH` broadband station.
pub static STATIONS: [StationRecord; 41] = [
    station("GBIEL", "S8C09", "CHASS", "GBIEL, Gymnasium Biel-Seeland Biel"),
    station("GLSTL", "RDFB5", "MUTEZ", "GLSTL, Gymnasium Liestal"),
    station("GOBWL", "RDFB5", "", "GOBWL, Gymnasium Oberwil"),
    station("GOBZL", "R19BB", "BALST", "GOBZL, Gymnasium Oberaargau"),
    station("GUSTZ", "R4335", "ZUR", "GUSTZ, Gymnasium Unterstrass"),
    station("KSCHR", "RB22F", "PLONS", "KSCHR, Bündner KS Chur"),
    station("KSENZ", "RD3C4", "", "KSENZ, KS Enge Zürich"),
    station("KSHOZ", "RE5E7", "ZUR", "KSHOZ, KS Hottingen Zürich"),
    station("KSKNZ", "RC23B", "ZUR", "KSKNZ, KS Küsnacht"),
    station("KSROM", "R58D2", "WALHA", "KSROM, KS Romanshorn"),
    station("KSRYC", "RF726", "WILA", "KSRYC, KS Rychenberg Winterthur"),
    station("KSSO", "RFE6B", "MOUTI", "KSSO, KS Solothurn"),
    station("KSURI", "R8F49", "MUO", "KSURI, KS Uri"),
    station("KSWAT", "R4AF0", "", "KSWAT, KS Wattwil"),
    station("KSZOW", "RF726", "WILA", "KSZOW, KS Zürcher Oberland, Wetzikon"),
    station("KSZUG", "R3BE0", "ZUR", "KSZUG, KS Zug"),
    station("MNGRZ", "R7DBB", "ZUR", "MNGRZ, MNG Rämibühl"),
    station("COAVI", "RA652", "VANNI", "COAVI, CO d'Anniviers"),
    station("COAYT", "RB15C", "SENIN", "COAYT, CO Ayent"),
    station("CLREN", "R3BDC", "", "CLREN, OFFLINE Collège du Léman"),
    station("COHEU", "RB289", "DIX", "COHEU, CO Hérens"),
    station("COLEY", "RA7C7", "GRYON", "COLEY, CO Leytron"),
    station("COLSL", "RE4EF", "VANNI", "COLSL, CO des Liddes"),
    station("COORS", "S3900", "MFERR", "COORS, CO Orsières"),
    station("COPCM", "RA83F", "ILLEZ", "COPCM, CO des Perraires"),
    station("COSAV", "R2D50", "SENIN", "COSAV, CO Savièse"),
    station("COSTG", "R7694", "SENIN", "COSTG, CO St-Guérin"),
    station("CPPSS", "R05D6", "SENIN", "CPPSS, partner institution (SION CPPS HES-SO)"),
    station("EAMCX", "S7A06", "SALAN", "EAMCX, Ecole de l'Arpille"),
    station("EDILA", "RC676", "GOURZ", "EDILA, partner institution (EDI LAUSANNE)"),
    station("EPSBE", "R65E9", "VINZL", "EPSBE, EPS de Begnins – L'Esplanade"),
    station("EPSEC", "R8710", "GOURZ", "EPSEC, EPS Ecublens"),
    station("EPSGD", "R3B57", "CHAMB", "EPSGD, EPS Grandson"),
    station("EPSLB", "R0CD2", "", "EPSLB, OFFLINE EPS Bergières"),
    station("EPSLE", "R5BF0", "GOURZ", "EPSLE, Collège/EPS de l'Elysée"),
    station("EPSVP", "RF727", "GOURZ", "EPSVP, EPSCL Collège du Verney"),
    station("ESLAS", "R8E4D", "LASAR", "ESLAS, ES de La Sarraz et environs"),
    station("ESNYM", "R5D35", "", "ESNYM, OFFLINE ES Nyon-Marens"),
    station("ESPEC", "R46E5", "", "ESPEC, OFFLINE ES du Pays-d'Enhaut"),
    station("ESTSE", "R52F7", "", "ESTSE, OFFLINE ES des Trois-Sapins"),
    station("ESSTI", "R1F5E", "CHASS", "ESSTI, ES St-Imier"),
];

pub fn default_station() -> &'static StationRecord {
    &STATIONS[0]
}

pub fn find_by_code(code: &str) -> Option<&'static StationRecord> {
    let code = code.trim();
    STATIONS
        .iter()
        .find(|s| s.local_code.eq_ignore_ascii_case(code))
}

/// Accepts either a bare station code or a full display label.
pub fn find_station(code_or_label: &str) -> Result<&'static StationRecord> {
    let code = code_or_label.split(',').next().unwrap_or_default();
    find_by_code(code).ok_or_else(|| ExplorerError::UnknownStation {
        code: code_or_label.trim().to_string(),
    })
}

/// Closest broadband station paired with a school, `None` if there is none.
pub fn nearest_reference_station(code: &str) -> Option<&'static str> {
    find_by_code(code).and_then(StationRecord::nearest_reference)
}
