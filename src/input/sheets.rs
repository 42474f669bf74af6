//! Per-sheet parsers.
//!
//! Parsers operate on plain row slices so the sheet logic is testable
//! without workbook files; `load_deck` feeds them the worksheet ranges.

use std::collections::{BTreeMap, HashMap};

use calamine::Data;

use super::cells::{
    cell_bool, cell_display, cell_f64, cell_is_empty, cell_usize, find_header_row,
};
use super::{
    AreaSheet, AttachmentSpec, CaseSpec, ClumpTypeSpec, DamageCaseSpec, DirectionCoefficients,
    EndTermination, GeneralSpec, GyradiusSet, LineTypeSpec, LoadAreaSpec, MooringLineSpec,
    SchemaError, SectionSpec, VesselSpec, WaveSpec, SHEET_AREAS, SHEET_CLUMP_TYPES,
    SHEET_DAMAGE_CASES, SHEET_FAIRLEADS, SHEET_GENERAL, SHEET_INTACT_CASES, SHEET_LINE_TYPES,
    SHEET_MOORING_LINES, SHEET_VESSEL,
};
use crate::frame::{
    canonical_heading, canonical_y, DirectionReference, FrameConfig, Handedness, LongitudinalDir,
    LongitudinalRef, RotationSense, VerticalRef,
};

/// First attachment-slot column of the mooring-line sheet (0-based,
/// including the name column); slots are `(clump id, offset)` pairs.
const ATTACHMENT_SLOT_START: usize = 10;

/// First section-slot column; slots are `(line type, length, target
/// segment length)` triples.
const SECTION_SLOT_START: usize = 17;

/// Key/value sheet: parameter names in the first column, values in the
/// second.
struct KeyValues<'a> {
    sheet: &'static str,
    map: HashMap<String, &'a Data>,
}

impl<'a> KeyValues<'a> {
    fn parse(sheet: &'static str, rows: &'a [Vec<Data>]) -> Self {
        let mut map = HashMap::new();
        for row in rows {
            let key = cell_display(row.first());
            if key.is_empty() || row.len() < 2 || cell_is_empty(row.get(1)) {
                continue;
            }
            map.entry(key).or_insert(&row[1]);
        }
        Self { sheet, map }
    }

    fn raw(&self, key: &str) -> Result<&'a Data, SchemaError> {
        self.map.get(key).copied().ok_or_else(|| SchemaError::MissingKey {
            sheet: self.sheet.to_string(),
            key: key.to_string(),
        })
    }

    fn text(&self, key: &str) -> Result<String, SchemaError> {
        Ok(cell_display(Some(self.raw(key)?)))
    }

    fn f64(&self, key: &str) -> Result<f64, SchemaError> {
        let cell = self.raw(key)?;
        cell_f64(Some(cell)).ok_or_else(|| SchemaError::BadValue {
            sheet: self.sheet.to_string(),
            context: key.to_string(),
            value: cell_display(Some(cell)),
            expected: "a number",
        })
    }

    fn f64_or(&self, key: &str, default: f64) -> Result<f64, SchemaError> {
        match self.map.get(key) {
            None => Ok(default),
            Some(_) => self.f64(key),
        }
    }

    fn parse_with<T>(
        &self,
        key: &str,
        expected: &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, SchemaError> {
        let label = self.text(key)?;
        parse(&label).ok_or_else(|| SchemaError::BadValue {
            sheet: self.sheet.to_string(),
            context: key.to_string(),
            value: label,
            expected,
        })
    }
}

/// Table sheet: a located header row with named columns, then data rows
/// until the key column runs out.
struct Table<'a> {
    sheet: &'static str,
    columns: HashMap<String, usize>,
    rows: &'a [Vec<Data>],
}

impl<'a> Table<'a> {
    fn parse(
        sheet: &'static str,
        rows: &'a [Vec<Data>],
        anchor: &'static str,
    ) -> Result<Self, SchemaError> {
        let (header_index, columns) =
            find_header_row(rows, anchor).ok_or_else(|| SchemaError::MissingColumn {
                sheet: sheet.to_string(),
                column: anchor.to_string(),
            })?;
        Ok(Self {
            sheet,
            columns,
            rows: &rows[header_index + 1..],
        })
    }

    fn column(&self, name: &str) -> Result<usize, SchemaError> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| SchemaError::MissingColumn {
                sheet: self.sheet.to_string(),
                column: name.to_string(),
            })
    }

    fn f64(&self, row: &[Data], name: &str, row_key: &str) -> Result<f64, SchemaError> {
        let index = self.column(name)?;
        cell_f64(row.get(index)).ok_or_else(|| SchemaError::BadValue {
            sheet: self.sheet.to_string(),
            context: format!("row '{row_key}', column '{name}'"),
            value: cell_display(row.get(index)),
            expected: "a number",
        })
    }

    fn f64_or(&self, row: &[Data], name: &str, default: f64) -> f64 {
        self.columns
            .get(name)
            .and_then(|&index| cell_f64(row.get(index)))
            .unwrap_or(default)
    }

    fn text(&self, row: &[Data], name: &str) -> Result<String, SchemaError> {
        let index = self.column(name)?;
        Ok(cell_display(row.get(index)))
    }
}

pub(super) fn parse_general(rows: &[Vec<Data>]) -> Result<GeneralSpec, SchemaError> {
    let kv = KeyValues::parse(SHEET_GENERAL, rows);
    let global_handedness =
        kv.parse_with("GRS", "'RHS' or 'LHS'", Handedness::from_label)?;
    Ok(GeneralSpec {
        frame: FrameConfig {
            global_handedness,
            gx_bearing_deg: kv.f64("GXDIR")?,
        },
        location_tag: kv.text("LOC_TAG")?,
        water_depth: kv.f64("SEA_DEPTH")?,
        dividing_period: kv.f64_or("DIV_PERIOD", 40.0)?,
    })
}

pub(super) fn parse_vessel(
    rows: &[Vec<Data>],
    grs: Handedness,
) -> Result<(VesselSpec, Handedness), SchemaError> {
    let kv = KeyValues::parse(SHEET_VESSEL, rows);

    let vrs = kv.parse_with("VRS", "'RHS' or 'LHS'", Handedness::from_label)?;
    let xref = kv.parse_with("XREF", "'FP', 'AP' or 'MIDSHIPS'", LongitudinalRef::from_label)?;
    let xdir = kv.parse_with("XDIR", "'FWD' or 'AFT'", LongitudinalDir::from_label)?;
    let zref = kv.parse_with("ZREF", "'BL' or 'DRAFT'", VerticalRef::from_label)?;

    let vessel = VesselSpec {
        tag: kv.text("TAG")?,
        type_name: kv.text("TYPE")?,
        name: kv.text("NAME")?,
        length: kv.f64("LENGTH")?,
        breadth: kv.f64("BREADTH")?,
        depth: kv.f64("DEPTH")?,
        draft: kv.f64("DRAFT")?,
        mass: kv.f64("MASS")?,
        gyradius: GyradiusSet {
            kxx: kv.f64("Kxx")?,
            kyy: kv.f64("Kyy")?,
            kzz: kv.f64("Kzz")?,
            kxy: kv.f64("Kxy")?,
            kyz: kv.f64("Kyz")?,
            kxz: kv.f64("Kxz")?,
        },
        centre_of_mass: [kv.f64("LCG")?, kv.f64("TCG")?, kv.f64("VCG")?],
        position: [
            kv.f64("XPOS")?,
            canonical_y(kv.f64("YPOS")?, grs),
            kv.f64("ZPOS")?,
        ],
        heel_deg: kv.f64("HEEL")?,
        trim_deg: kv.f64("TRIM")?,
        heading_deg: canonical_heading(kv.f64("HEADING")?, grs),
        xref,
        xdir,
        zref,
    };
    Ok((vessel, vrs))
}

fn parse_load_area(table: &Table<'_>, row: &[Data], row_key: &str) -> Result<LoadAreaSpec, SchemaError> {
    Ok(LoadAreaSpec {
        surge_area: table.f64(row, "SURGE_AREA", row_key)?,
        sway_area: table.f64(row, "SWAY_AREA", row_key)?,
        heave_area: table.f64(row, "HEAVE_AREA", row_key)?,
        roll_moment: table.f64(row, "ROLL_AREAMOM", row_key)?,
        pitch_moment: table.f64(row, "PITCH_AREAMOM", row_key)?,
        yaw_moment: table.f64(row, "YAW_AREAMOM", row_key)?,
        origin: [
            table.f64(row, "X_ORG", row_key)?,
            table.f64(row, "Y_ORG", row_key)?,
            table.f64(row, "Z_ORG", row_key)?,
        ],
    })
}

pub(super) fn parse_areas(rows: &[Vec<Data>]) -> Result<AreaSheet, SchemaError> {
    let table = Table::parse(SHEET_AREAS, rows, "SURGE_AREA")?;
    let mut current = None;
    let mut wind = None;
    for row in table.rows {
        match cell_display(row.first()).as_str() {
            "CURRENT" => current = Some(parse_load_area(&table, row, "CURRENT")?),
            "WIND" => wind = Some(parse_load_area(&table, row, "WIND")?),
            _ => {}
        }
    }
    let current = current.ok_or_else(|| SchemaError::MissingKey {
        sheet: SHEET_AREAS.to_string(),
        key: "CURRENT".to_string(),
    })?;
    let wind = wind.ok_or_else(|| SchemaError::MissingKey {
        sheet: SHEET_AREAS.to_string(),
        key: "WIND".to_string(),
    })?;
    Ok(AreaSheet { current, wind })
}

pub(super) fn parse_direction_coeffs(
    sheet: &'static str,
    rows: &[Vec<Data>],
) -> Result<Vec<DirectionCoefficients>, SchemaError> {
    let table = Table::parse(sheet, rows, "DIR")?;
    let dir_column = table.column("DIR")?;
    let mut coeffs = Vec::new();
    for row in table.rows {
        if cell_is_empty(row.get(dir_column)) {
            break;
        }
        let key = cell_display(row.get(dir_column));
        coeffs.push(DirectionCoefficients {
            direction_deg: table.f64(row, "DIR", &key)?,
            surge: table.f64(row, "SURGE", &key)?,
            sway: table.f64(row, "SWAY", &key)?,
            heave: table.f64(row, "HEAVE", &key)?,
            roll: table.f64(row, "ROLL", &key)?,
            pitch: table.f64(row, "PITCH", &key)?,
            yaw: table.f64(row, "YAW", &key)?,
        });
    }
    Ok(coeffs)
}

pub(super) fn parse_fairleads(
    rows: &[Vec<Data>],
    vrs: Handedness,
) -> Result<BTreeMap<String, [f64; 3]>, SchemaError> {
    let table = Table::parse(SHEET_FAIRLEADS, rows, "X_FL")?;
    let mut fairleads = BTreeMap::new();
    for row in table.rows {
        let id = cell_display(row.first());
        if id.is_empty() {
            break;
        }
        let position = [
            table.f64(row, "X_FL", &id)?,
            canonical_y(table.f64(row, "Y_FL", &id)?, vrs),
            table.f64(row, "Z_FL", &id)?,
        ];
        fairleads.insert(id, position);
    }
    Ok(fairleads)
}

pub(super) fn parse_line_types(rows: &[Vec<Data>]) -> Result<Vec<LineTypeSpec>, SchemaError> {
    let table = Table::parse(SHEET_LINE_TYPES, rows, "WIZARD")?;
    let wizard_column = table.column("WIZARD")?;
    let mut line_types = Vec::new();
    for row in table.rows {
        let name = cell_display(row.first());
        if name.is_empty() {
            break;
        }
        let wizard = cell_bool(row.get(wizard_column)).unwrap_or(false);
        let nominal_diameter = if wizard {
            table.f64(row, "NOM_DIA", &name)?
        } else {
            table.f64_or(row, "NOM_DIA", 0.0)
        };
        line_types.push(LineTypeSpec {
            wizard,
            family: table.text(row, "LTYP")?,
            construction: table.text(row, "SUBTYP")?,
            nominal_diameter,
            name,
        });
    }
    Ok(line_types)
}

pub(super) fn parse_clump_types(rows: &[Vec<Data>]) -> Result<Vec<ClumpTypeSpec>, SchemaError> {
    let table = Table::parse(SHEET_CLUMP_TYPES, rows, "MASS")?;
    let mut clump_types = Vec::new();
    for row in table.rows {
        let name = cell_display(row.first());
        if name.is_empty() {
            break;
        }
        clump_types.push(ClumpTypeSpec {
            mass: table.f64(row, "MASS", &name)?,
            volume: table.f64(row, "VOLUME", &name)?,
            height: table.f64(row, "HEIGHT", &name)?,
            offset: table.f64(row, "OFFSET", &name)?,
            name,
        });
    }
    Ok(clump_types)
}

pub(super) fn parse_mooring_lines(rows: &[Vec<Data>]) -> Result<Vec<MooringLineSpec>, SchemaError> {
    let table = Table::parse(SHEET_MOORING_LINES, rows, "ENDA_CONN")?;
    let mut lines = Vec::new();
    for row in table.rows {
        let name = cell_display(row.first());
        if name.is_empty() {
            break;
        }

        let end_label = table.text(row, "ENDB_CONN")?;
        let end_b = EndTermination::from_label(&end_label).ok_or_else(|| SchemaError::BadValue {
            sheet: SHEET_MOORING_LINES.to_string(),
            context: format!("row '{name}', column 'ENDB_CONN'"),
            value: end_label,
            expected: "an end termination",
        })?;

        let lay_setup = table.text(row, "LAY_SETUP")?;
        let pretension = if lay_setup == "PRE_TENS" {
            Some(table.f64(row, "PRE_TENS", &name)?)
        } else {
            None
        };

        // The slot groups are wide fixed-position columns; the declared
        // counts are authoritative for how many slots are consumed.
        let section_count = require_count(&table, row, "N_SECS", &name)?;
        let mut sections = Vec::with_capacity(section_count);
        for slot in 0..section_count {
            let base = SECTION_SLOT_START + slot * 3;
            sections.push(SectionSpec {
                line_type: require_slot_id(row, base, &name, "line type")?,
                length: require_slot_f64(row, base + 1, &name, "section length")?,
                target_segment_length: require_slot_f64(row, base + 2, &name, "target segment length")?,
            });
        }

        let attachment_count = require_count(&table, row, "N_BUOYS", &name)?;
        let mut attachments = Vec::with_capacity(attachment_count);
        for slot in 0..attachment_count {
            let base = ATTACHMENT_SLOT_START + slot * 2;
            attachments.push(AttachmentSpec {
                clump_type: require_slot_id(row, base, &name, "clump type")?,
                offset_from_end_b: require_slot_f64(row, base + 1, &name, "attachment offset")?,
            });
        }

        lines.push(MooringLineSpec {
            fairlead_id: table.text(row, "ENDA_CONN")?,
            end_b,
            horizontal_distance: table.f64(row, "HORZ_DIST", &name)?,
            azimuth_deg: table.f64(row, "AZIMUTH", &name)?,
            vertical_position: table.f64(row, "VERT_POS", &name)?,
            pretension,
            sections,
            attachments,
            name,
        });
    }
    Ok(lines)
}

fn require_count(
    table: &Table<'_>,
    row: &[Data],
    column: &str,
    row_key: &str,
) -> Result<usize, SchemaError> {
    let index = table.column(column)?;
    cell_usize(row.get(index)).ok_or_else(|| SchemaError::BadValue {
        sheet: SHEET_MOORING_LINES.to_string(),
        context: format!("row '{row_key}', column '{column}'"),
        value: cell_display(row.get(index)),
        expected: "a non-negative count",
    })
}

fn require_slot_id(
    row: &[Data],
    index: usize,
    row_key: &str,
    what: &'static str,
) -> Result<String, SchemaError> {
    let id = cell_display(row.get(index));
    if id.is_empty() {
        return Err(SchemaError::BadValue {
            sheet: SHEET_MOORING_LINES.to_string(),
            context: format!("row '{row_key}', slot column {index}"),
            value: String::new(),
            expected: what,
        });
    }
    Ok(id)
}

fn require_slot_f64(
    row: &[Data],
    index: usize,
    row_key: &str,
    what: &'static str,
) -> Result<f64, SchemaError> {
    cell_f64(row.get(index)).ok_or_else(|| SchemaError::BadValue {
        sheet: SHEET_MOORING_LINES.to_string(),
        context: format!("row '{row_key}', slot column {index}"),
        value: cell_display(row.get(index)),
        expected: what,
    })
}

fn parse_case_row(
    table: &Table<'_>,
    row: &[Data],
    sheet: &'static str,
) -> Result<CaseSpec, SchemaError> {
    let id = table.text(row, "CASE_ID")?;

    let ref_label = table.text(row, "DIR_REF")?;
    let direction_ref =
        DirectionReference::from_label(&ref_label).ok_or_else(|| SchemaError::BadValue {
            sheet: sheet.to_string(),
            context: format!("case '{id}', column 'DIR_REF'"),
            value: ref_label,
            expected: "a direction reference",
        })?;

    let sense_label = table.text(row, "DIR_CONV")?;
    let sense = RotationSense::from_label(&sense_label).ok_or_else(|| SchemaError::BadValue {
        sheet: sheet.to_string(),
        context: format!("case '{id}', column 'DIR_CONV'"),
        value: sense_label,
        expected: "'CLOCKWISE' or 'ANTICLOCKWISE'",
    })?;

    Ok(CaseSpec {
        nominal_direction_deg: table.f64(row, "DIR", &id)?,
        wave: WaveSpec {
            wave_type: table.text(row, "WAVE_TYPE")?,
            hs: table.f64(row, "Hs", &id)?,
            tp: table.f64(row, "Tp", &id)?,
            gamma: table.f64_or(row, "GAMMA", 1.0),
        },
        wind_speed: table.f64(row, "Vw", &id)?,
        current_speed: table.f64(row, "Vc", &id)?,
        direction_ref,
        sense,
        id,
    })
}

pub(super) fn parse_intact_cases(rows: &[Vec<Data>]) -> Result<Vec<CaseSpec>, SchemaError> {
    let table = Table::parse(SHEET_INTACT_CASES, rows, "CASE_ID")?;
    let id_column = table.column("CASE_ID")?;
    let mut cases = Vec::new();
    for row in table.rows {
        if cell_is_empty(row.get(id_column)) {
            break;
        }
        cases.push(parse_case_row(&table, row, SHEET_INTACT_CASES)?);
    }
    Ok(cases)
}

pub(super) fn parse_damage_cases(rows: &[Vec<Data>]) -> Result<Vec<DamageCaseSpec>, SchemaError> {
    let table = Table::parse(SHEET_DAMAGE_CASES, rows, "CASE_ID")?;
    let id_column = table.column("CASE_ID")?;
    let mut cases = Vec::new();
    for row in table.rows {
        if cell_is_empty(row.get(id_column)) {
            break;
        }
        let case = parse_case_row(&table, row, SHEET_DAMAGE_CASES)?;
        let removed_line = table.text(row, "DAM_LIN")?;
        if removed_line.is_empty() {
            return Err(SchemaError::BadValue {
                sheet: SHEET_DAMAGE_CASES.to_string(),
                context: format!("case '{}', column 'DAM_LIN'", case.id),
                value: String::new(),
                expected: "a mooring line name",
            });
        }
        cases.push(DamageCaseSpec { case, removed_line });
    }
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    fn n(value: f64) -> Data {
        Data::Float(value)
    }

    fn general_rows() -> Vec<Vec<Data>> {
        vec![
            vec![s("GENERAL DATA")],
            vec![s("PARAM"), s("VAL")],
            vec![s("GRS"), s("LHS")],
            vec![s("GXDIR"), n(30.0)],
            vec![s("LOC_TAG"), s("West Field")],
            vec![s("SEA_DEPTH"), n(85.0)],
        ]
    }

    #[test]
    fn general_sheet_parses_with_default_dividing_period() {
        let general = parse_general(&general_rows()).unwrap();
        assert_eq!(general.frame.global_handedness, Handedness::Lhs);
        assert_eq!(general.frame.gx_bearing_deg, 30.0);
        assert_eq!(general.location_tag, "West Field");
        assert_eq!(general.water_depth, 85.0);
        assert_eq!(general.dividing_period, 40.0);
    }

    #[test]
    fn general_sheet_missing_key_is_named() {
        let mut rows = general_rows();
        rows.retain(|row| cell_display(row.first()) != "SEA_DEPTH");
        let err = parse_general(&rows).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("General"), "{message}");
        assert!(message.contains("SEA_DEPTH"), "{message}");
    }

    fn vessel_rows() -> Vec<Vec<Data>> {
        let pairs: Vec<(&str, Data)> = vec![
            ("TAG", s("FPSO Alpha")),
            ("TYPE", s("Vessel Type 1")),
            ("NAME", s("FPSO")),
            ("LENGTH", n(200.0)),
            ("BREADTH", n(40.0)),
            ("DEPTH", n(25.0)),
            ("DRAFT", n(12.0)),
            ("MASS", n(120_000.0)),
            ("Kxx", n(14.0)),
            ("Kyy", n(50.0)),
            ("Kzz", n(52.0)),
            ("Kxy", n(0.0)),
            ("Kyz", n(0.0)),
            ("Kxz", n(0.0)),
            ("LCG", n(100.0)),
            ("TCG", n(0.0)),
            ("VCG", n(15.0)),
            ("XPOS", n(0.0)),
            ("YPOS", n(50.0)),
            ("ZPOS", n(0.0)),
            ("HEEL", n(0.0)),
            ("TRIM", n(0.0)),
            ("HEADING", n(90.0)),
            ("XREF", s("FP")),
            ("XDIR", s("AFT")),
            ("ZREF", s("BL")),
            ("VRS", s("LHS")),
        ];
        pairs
            .into_iter()
            .map(|(key, value)| vec![s(key), value])
            .collect()
    }

    #[test]
    fn vessel_pose_is_canonicalized_once_at_ingestion() {
        let (vessel, vrs) = parse_vessel(&vessel_rows(), Handedness::Lhs).unwrap();
        assert_eq!(vessel.position[1], -50.0);
        assert_eq!(vessel.heading_deg, 270.0);
        assert_eq!(vrs, Handedness::Lhs);
        assert_eq!(vessel.xref, LongitudinalRef::ForePerpendicular);
    }

    #[test]
    fn right_handed_vessel_pose_is_untouched() {
        let (vessel, _) = parse_vessel(&vessel_rows(), Handedness::Rhs).unwrap();
        assert_eq!(vessel.position[1], 50.0);
        assert_eq!(vessel.heading_deg, 90.0);
    }

    #[test]
    fn fairlead_y_follows_the_vessel_reference_system() {
        let rows = vec![
            vec![s("FAIRLEADS")],
            vec![s("ID"), s("X_FL"), s("Y_FL"), s("Z_FL")],
            vec![s("FL1"), n(95.0), n(18.0), n(22.0)],
            vec![s("FL2"), n(-95.0), n(-18.0), n(22.0)],
        ];
        let fairleads = parse_fairleads(&rows, Handedness::Lhs).unwrap();
        assert_eq!(fairleads["FL1"], [95.0, -18.0, 22.0]);
        assert_eq!(fairleads["FL2"], [-95.0, 18.0, 22.0]);
    }

    fn mooring_row(name: &str, n_secs: f64, n_buoys: f64) -> Vec<Data> {
        let mut row = vec![
            s(name),      // 0 name
            s("FL1"),     // 1 ENDA_CONN
            s("Anchored"),// 2 ENDB_CONN
            n(900.0),     // 3 HORZ_DIST
            n(45.0),      // 4 AZIMUTH
            n(0.0),       // 5 VERT_POS
            s("PRE_TENS"),// 6 LAY_SETUP
            n(1500.0),    // 7 PRE_TENS
            n(n_secs),    // 8 N_SECS
            n(n_buoys),   // 9 N_BUOYS
        ];
        // attachment slots (columns 10..): two pairs available
        row.extend([s("CB1"), n(120.0), s("CB1"), n(240.0)]);
        // pad to the section base, then two triples
        while row.len() < SECTION_SLOT_START {
            row.push(Data::Empty);
        }
        row.extend([
            s("LT_CHAIN"),
            n(150.0),
            n(5.0),
            s("LT_WIRE"),
            n(600.0),
            n(10.0),
        ]);
        row
    }

    fn mooring_header() -> Vec<Data> {
        vec![
            s("NAME"),
            s("ENDA_CONN"),
            s("ENDB_CONN"),
            s("HORZ_DIST"),
            s("AZIMUTH"),
            s("VERT_POS"),
            s("LAY_SETUP"),
            s("PRE_TENS"),
            s("N_SECS"),
            s("N_BUOYS"),
        ]
    }

    #[test]
    fn declared_counts_are_authoritative_for_slot_consumption() {
        let rows = vec![mooring_header(), mooring_row("ML1", 2.0, 1.0)];
        let lines = parse_mooring_lines(&rows).unwrap();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.sections.len(), 2);
        assert_eq!(line.attachments.len(), 1);
        assert_eq!(line.sections[0].line_type, "LT_CHAIN");
        assert_eq!(line.sections[1].length, 600.0);
        assert_eq!(line.attachments[0].offset_from_end_b, 120.0);
        assert_eq!(line.pretension, Some(1500.0));
    }

    #[test]
    fn missing_slot_for_a_declared_section_is_an_error() {
        let rows = vec![mooring_header(), mooring_row("ML1", 3.0, 0.0)];
        let err = parse_mooring_lines(&rows).unwrap_err();
        assert!(err.to_string().contains("ML1"));
    }

    #[test]
    fn missing_leading_column_is_named() {
        let mut header = mooring_header();
        header[4] = s("BEARING");
        let rows = vec![header, mooring_row("ML1", 0.0, 0.0)];
        let err = parse_mooring_lines(&rows).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("AZIMUTH"), "{message}");
    }

    fn case_header(with_damage: bool) -> Vec<Data> {
        let mut header = vec![
            s("CASE_ID"),
            s("DIR_REF"),
            s("DIR_CONV"),
            s("DIR"),
            s("WAVE_TYPE"),
            s("Hs"),
            s("Tp"),
            s("GAMMA"),
            s("Vw"),
            s("Vc"),
        ];
        if with_damage {
            header.push(s("DAM_LIN"));
        }
        header
    }

    #[test]
    fn intact_case_rows_parse_until_the_ids_run_out() {
        let rows = vec![
            vec![s("INTACT CASES")],
            case_header(false),
            vec![
                s("IC 01"),
                s("NORTH"),
                s("ANTICLOCKWISE"),
                n(45.0),
                s("JONSWAP"),
                n(4.5),
                n(9.0),
                n(2.0),
                n(18.0),
                n(0.9),
            ],
            vec![Data::Empty],
        ];
        let cases = parse_intact_cases(&rows).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].id, "IC 01");
        assert_eq!(cases[0].direction_ref, DirectionReference::North);
        assert!(cases[0].wave.is_spectral());
        assert_eq!(cases[0].wave.gamma, 2.0);
    }

    #[test]
    fn damage_case_requires_the_line_to_remove() {
        let rows = vec![
            case_header(true),
            vec![
                s("DC1"),
                s("GLOBX"),
                s("CLOCKWISE"),
                n(30.0),
                s("Airy"),
                n(3.0),
                n(8.0),
                Data::Empty,
                n(15.0),
                n(0.5),
                s("ML2"),
            ],
        ];
        let cases = parse_damage_cases(&rows).unwrap();
        assert_eq!(cases[0].removed_line, "ML2");
        assert!(!cases[0].case.wave.is_spectral());
        assert_eq!(cases[0].case.wave.gamma, 1.0);
    }

    #[test]
    fn unknown_direction_reference_is_rejected() {
        let rows = vec![
            case_header(false),
            vec![
                s("IC1"),
                s("NORTHWEST"),
                s("CLOCKWISE"),
                n(10.0),
                s("Airy"),
                n(2.0),
                n(7.0),
                Data::Empty,
                n(10.0),
                n(0.2),
            ],
        ];
        let err = parse_intact_cases(&rows).unwrap_err();
        assert!(err.to_string().contains("NORTHWEST"));
    }
}
