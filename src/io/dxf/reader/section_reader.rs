//! DXF section readers

use super::stream_reader::{DxfCodePair, DxfStreamReader, PointReader};
use crate::document::DxfDocument;
use crate::entities::*;
use crate::error::Result;
use crate::notification::NotificationType;
use crate::tables::{Layer, LayerFlags};
use crate::types::{DxfVersion, Vector2, Vector3};
use indexmap::IndexMap;

/// POLYLINE flag bits that turn the vertex list into a mesh
const POLYLINE_MESH_FLAGS: i16 = 16 | 64;
/// VERTEX flag bit of a polyface face record
const VERTEX_FACE_RECORD: i16 = 128;

/// Section reader for parsing DXF sections
pub struct SectionReader<'a> {
    reader: &'a mut Box<dyn DxfStreamReader>,
}

impl<'a> SectionReader<'a> {
    /// Create a new section reader
    pub fn new(reader: &'a mut Box<dyn DxfStreamReader>) -> Self {
        Self { reader }
    }

    /// Read the HEADER section
    pub fn read_header(&mut self, document: &mut DxfDocument) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("ENDSEC") {
                break;
            }
            if pair.code != 9 {
                continue;
            }

            match pair.value_string.as_str() {
                "$ACADVER" => {
                    if let Some(p) = self.read_header_value()? {
                        document.version = DxfVersion::from_version_string(p.as_str());
                    }
                }
                "$DWGCODEPAGE" => {
                    if let Some(p) = self.read_header_value()? {
                        document.header.code_page = Some(p.value_string);
                    }
                }
                "$INSUNITS" => {
                    if let Some(p) = self.read_header_value()? {
                        document.header.insunits = p.as_i16();
                    }
                }
                "$EXTMIN" => document.header.extents_min = self.read_header_point()?,
                "$EXTMAX" => document.header.extents_max = self.read_header_point()?,
                _ => {}
            }
        }

        Ok(())
    }

    /// Value pair of a single-valued header variable
    fn read_header_value(&mut self) -> Result<Option<DxfCodePair>> {
        match self.reader.read_pair()? {
            Some(p) if p.code == 0 || p.code == 9 => {
                self.reader.push_back(p);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Point-valued header variable (10/20/30)
    fn read_header_point(&mut self) -> Result<Option<Vector2>> {
        let mut point = PointReader::new();
        while let Some(p) = self.reader.read_pair()? {
            if !point.add_coordinate(&p) {
                self.reader.push_back(p);
                break;
            }
        }
        Ok(point.get_point().map(|p| p.xy()))
    }

    /// Read the TABLES section; only LAYER entries are kept
    pub fn read_tables(&mut self, document: &mut DxfDocument) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("ENDSEC") {
                break;
            }

            if pair.is_marker("TABLE") {
                if let Some(name_pair) = self.reader.read_pair()? {
                    if name_pair.code == 2 && name_pair.value_string == "LAYER" {
                        self.read_layer_table(document)?;
                    } else if name_pair.code == 0 {
                        self.reader.push_back(name_pair);
                    } else {
                        self.skip_to_endtab()?;
                    }
                }
            }
        }

        Ok(())
    }

    fn skip_to_endtab(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("ENDTAB") {
                break;
            }
        }
        Ok(())
    }

    /// Read LAYER table
    fn read_layer_table(&mut self, document: &mut DxfDocument) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("ENDTAB") {
                break;
            }

            if pair.is_marker("LAYER") {
                if let Some(layer) = self.read_layer_entry()? {
                    document.layers.add(layer);
                }
            }
        }
        Ok(())
    }

    /// Read a single LAYER entry
    fn read_layer_entry(&mut self) -> Result<Option<Layer>> {
        let mut name = None;
        let mut flags = 0i16;
        let mut color = 7i16;

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }

            match pair.code {
                2 => name = Some(pair.value_string),
                62 => color = pair.as_i16().unwrap_or(color),
                70 => flags = pair.as_i16().unwrap_or(flags),
                _ => {}
            }
        }

        Ok(name.map(|name| {
            let mut layer = Layer::new(name);
            layer.flags = LayerFlags::from_dxf(flags, color);
            layer.color_index = color.abs();
            layer
        }))
    }

    /// Read the ENTITIES section.
    ///
    /// Entity types that carry no quantity are skipped; each skipped type is
    /// reported once with its count.
    pub fn read_entities(&mut self, document: &mut DxfDocument) -> Result<()> {
        let mut skipped: IndexMap<String, usize> = IndexMap::new();

        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("ENDSEC") {
                break;
            }
            if pair.code != 0 {
                continue;
            }

            match pair.value_string.as_str() {
                "INSERT" => {
                    if let Some(entity) = self.read_insert()? {
                        document.add_entity(EntityType::Insert(entity));
                    }
                }
                "LINE" => {
                    if let Some(entity) = self.read_line()? {
                        document.add_entity(EntityType::Line(entity));
                    }
                }
                "LWPOLYLINE" => {
                    if let Some(entity) = self.read_lwpolyline()? {
                        document.add_entity(EntityType::LwPolyline(entity));
                    }
                }
                "POLYLINE" => {
                    if let Some(entity) = self.read_polyline()? {
                        document.add_entity(EntityType::Polyline(entity));
                    }
                }
                "TEXT" => {
                    if let Some(entity) = self.read_text()? {
                        document.add_entity(EntityType::Text(entity));
                    }
                }
                "MTEXT" => {
                    if let Some(entity) = self.read_mtext()? {
                        document.add_entity(EntityType::MText(entity));
                    }
                }
                other => *skipped.entry(other.to_string()).or_insert(0) += 1,
            }
        }

        for (type_name, count) in skipped {
            document.notifications.notify(
                NotificationType::NotImplemented,
                format!("{} {} entities skipped", count, type_name),
            );
        }

        Ok(())
    }

    /// Skip a section, leaving the reader after its ENDSEC
    pub fn skip_section(&mut self) -> Result<()> {
        while let Some(pair) = self.reader.read_pair()? {
            if pair.is_marker("ENDSEC") {
                break;
            }
        }
        Ok(())
    }

    // ===== Entity Readers =====

    /// Read an INSERT entity
    fn read_insert(&mut self) -> Result<Option<Insert>> {
        let mut common = EntityCommon::new();
        let mut block_name = String::new();
        let mut insertion = PointReader::new();
        let mut column_count = 1u16;
        let mut row_count = 1u16;
        let mut column_spacing = 0.0;
        let mut row_spacing = 0.0;

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            if read_common(&mut common, &pair) {
                continue;
            }

            match pair.code {
                2 => block_name = pair.value_string.clone(),
                10 | 20 | 30 => {
                    insertion.add_coordinate(&pair);
                }
                70 => {
                    if let Some(count) = pair.as_i16() {
                        column_count = count.max(1) as u16;
                    }
                }
                71 => {
                    if let Some(count) = pair.as_i16() {
                        row_count = count.max(1) as u16;
                    }
                }
                44 => column_spacing = pair.as_double().unwrap_or(column_spacing),
                45 => row_spacing = pair.as_double().unwrap_or(row_spacing),
                _ => {}
            }
        }

        let insert_point = insertion.get_point().unwrap_or(Vector3::ZERO);
        let mut insert = Insert::new(block_name, insert_point);
        insert.common = common;
        insert.column_count = column_count;
        insert.row_count = row_count;
        insert.column_spacing = column_spacing;
        insert.row_spacing = row_spacing;

        Ok(Some(insert))
    }

    /// Read a LINE entity
    fn read_line(&mut self) -> Result<Option<Line>> {
        let mut line = Line::new();
        let mut start = PointReader::new();
        let mut end = PointReader::new();

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            if read_common(&mut line.common, &pair) {
                continue;
            }

            match pair.code {
                10 | 20 | 30 => {
                    start.add_coordinate(&pair);
                }
                11 | 21 | 31 => {
                    end.add_coordinate(&pair);
                }
                _ => {}
            }
        }

        // a line without both end points has no length
        let (Some(start), Some(end)) = (start.get_point(), end.get_point()) else {
            return Ok(None);
        };
        line.start = start;
        line.end = end;

        Ok(Some(line))
    }

    /// Read an LWPOLYLINE entity
    fn read_lwpolyline(&mut self) -> Result<Option<LwPolyline>> {
        let mut lwpolyline = LwPolyline::new();
        // x of the vertex whose y has not been read yet
        let mut pending_x: Option<f64> = None;

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            if read_common(&mut lwpolyline.common, &pair) {
                continue;
            }

            match pair.code {
                70 => {
                    if let Some(flags) = pair.as_i16() {
                        lwpolyline.is_closed = (flags & 1) != 0;
                    }
                }
                38 => lwpolyline.elevation = pair.as_double().unwrap_or(0.0),
                // an x still pending here had no y and is dropped
                10 => pending_x = pair.as_double(),
                20 => {
                    if let (Some(x), Some(y)) = (pending_x.take(), pair.as_double()) {
                        lwpolyline.vertices.push(LwVertex::new(Vector2::new(x, y)));
                    }
                }
                // bulge belongs to the vertex completed last
                42 => {
                    if let (Some(bulge), Some(vertex)) =
                        (pair.as_double(), lwpolyline.vertices.last_mut())
                    {
                        vertex.bulge = bulge;
                    }
                }
                _ => {}
            }
        }

        Ok(Some(lwpolyline))
    }

    /// Read a POLYLINE entity with its VERTEX records up to SEQEND
    fn read_polyline(&mut self) -> Result<Option<Polyline>> {
        let mut polyline = Polyline::new();
        let mut is_mesh = false;

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                if pair.value_string == "VERTEX" {
                    let mut vertex_reader = PointReader::new();
                    let mut vertex_flags = 0i16;

                    while let Some(vpair) = self.reader.read_pair()? {
                        if vpair.code == 0 {
                            self.reader.push_back(vpair);
                            break;
                        }
                        match vpair.code {
                            10 | 20 | 30 => {
                                vertex_reader.add_coordinate(&vpair);
                            }
                            70 => vertex_flags = vpair.as_i16().unwrap_or(0),
                            _ => {}
                        }
                    }

                    if is_mesh || vertex_flags & VERTEX_FACE_RECORD != 0 {
                        continue;
                    }
                    if let Some(pt) = vertex_reader.get_point() {
                        polyline.vertices.push(pt);
                    }
                } else if pair.value_string == "SEQEND" {
                    while let Some(seqend_pair) = self.reader.read_pair()? {
                        if seqend_pair.code == 0 {
                            self.reader.push_back(seqend_pair);
                            break;
                        }
                    }
                    break;
                } else {
                    // missing SEQEND
                    self.reader.push_back(pair);
                    break;
                }
            } else if !read_common(&mut polyline.common, &pair) && pair.code == 70 {
                if let Some(flags) = pair.as_i16() {
                    polyline.is_closed = (flags & 1) != 0;
                    is_mesh = (flags & POLYLINE_MESH_FLAGS) != 0;
                }
            }
        }

        Ok(Some(polyline))
    }

    /// Read a TEXT entity
    fn read_text(&mut self) -> Result<Option<Text>> {
        let mut text = Text::new(String::new(), Vector3::ZERO);
        let mut insertion = PointReader::new();

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            if read_common(&mut text.common, &pair) {
                continue;
            }

            match pair.code {
                10 | 20 | 30 => {
                    insertion.add_coordinate(&pair);
                }
                1 => text.value = pair.value_string.clone(),
                _ => {}
            }
        }

        if let Some(pt) = insertion.get_point() {
            text.insertion_point = pt;
        }

        Ok(Some(text))
    }

    /// Read an MTEXT entity; long values arrive as code-3 chunks before code 1
    fn read_mtext(&mut self) -> Result<Option<MText>> {
        let mut common = EntityCommon::new();
        let mut insertion = PointReader::new();
        let mut raw = String::new();

        while let Some(pair) = self.reader.read_pair()? {
            if pair.code == 0 {
                self.reader.push_back(pair);
                break;
            }
            if read_common(&mut common, &pair) {
                continue;
            }

            match pair.code {
                10 | 20 | 30 => {
                    insertion.add_coordinate(&pair);
                }
                3 | 1 => raw.push_str(pair.as_str()),
                _ => {}
            }
        }

        let mut mtext = MText::from_raw(&raw, insertion.get_point().unwrap_or(Vector3::ZERO));
        mtext.common = common;
        Ok(Some(mtext))
    }
}

/// Apply a pair shared by every entity; `true` if it was one
fn read_common(common: &mut EntityCommon, pair: &DxfCodePair) -> bool {
    match pair.code {
        8 => common.layer = pair.value_string.clone(),
        62 => common.color_index = pair.as_i16(),
        67 => common.paper_space = pair.as_i16().unwrap_or(0) == 1,
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dxf::reader::DxfTextReader;
    use std::io::Cursor;

    fn reader(dxf: &str) -> Box<dyn DxfStreamReader> {
        Box::new(DxfTextReader::new(Cursor::new(dxf.as_bytes().to_vec())))
    }

    fn entities(body: &str) -> DxfDocument {
        let mut r = reader(&format!("{}0\nENDSEC\n", body));
        let mut doc = DxfDocument::new();
        SectionReader::new(&mut r).read_entities(&mut doc).unwrap();
        doc
    }

    #[test]
    fn test_header_variables() {
        let mut r = reader(
            "9\n$ACADVER\n1\nAC1015\n9\n$INSUNITS\n70\n4\n\
             9\n$EXTMIN\n10\n0.0\n20\n-5.0\n30\n0.0\n9\n$EXTMAX\n10\n100.0\n20\n50.0\n\
             9\n$DWGCODEPAGE\n3\nANSI_1250\n0\nENDSEC\n",
        );
        let mut doc = DxfDocument::new();
        SectionReader::new(&mut r).read_header(&mut doc).unwrap();
        assert_eq!(doc.version, DxfVersion::AC1015);
        assert_eq!(doc.header.insunits, Some(4));
        assert_eq!(doc.header.extents_min, Some(Vector2::new(0.0, -5.0)));
        assert_eq!(doc.header.extents_max, Some(Vector2::new(100.0, 50.0)));
        assert_eq!(doc.header.code_page.as_deref(), Some("ANSI_1250"));
    }

    #[test]
    fn test_layer_table() {
        let mut r = reader(
            "0\nTABLE\n2\nLTYPE\n0\nLTYPE\n2\nCONTINUOUS\n0\nENDTAB\n\
             0\nTABLE\n2\nLAYER\n0\nLAYER\n2\nKABEL\n70\n1\n62\n-3\n0\nLAYER\n2\nVILL\n62\n1\n0\nENDTAB\n\
             0\nENDSEC\n",
        );
        let mut doc = DxfDocument::new();
        SectionReader::new(&mut r).read_tables(&mut doc).unwrap();
        assert_eq!(doc.layers.len(), 2);
        let kabel = doc.layers.get("kabel").unwrap();
        assert!(kabel.is_frozen());
        assert!(kabel.is_off());
        assert_eq!(kabel.color_index, 3);
        assert!(!doc.layers.get("VILL").unwrap().is_off());
    }

    #[test]
    fn test_insert_and_minsert() {
        let doc = entities(
            "0\nINSERT\n8\nVILL\n2\nAljzat-2P\n10\n1.0\n20\n2.0\n\
             0\nINSERT\n8\nVILL\n2\nLAMPA\n70\n3\n71\n2\n44\n10.0\n45\n5.0\n10\n0.0\n20\n0.0\n",
        );
        assert_eq!(doc.entity_count(), 2);
        match &doc.entities[1] {
            EntityType::Insert(i) => {
                assert_eq!(i.instance_count(), 6);
                assert_eq!(i.common.layer, "VILL");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lwpolyline_with_bulge() {
        let doc = entities(
            "0\nLWPOLYLINE\n8\nKABEL\n90\n3\n70\n1\n10\n0.0\n20\n0.0\n42\n0.5\n10\n10.0\n20\n0.0\n10\n10.0\n20\n10.0\n",
        );
        match &doc.entities[0] {
            EntityType::LwPolyline(p) => {
                assert!(p.is_closed);
                assert_eq!(p.vertices.len(), 3);
                assert_eq!(p.vertices[0].bulge, 0.5);
                assert_eq!(p.vertices[1].bulge, 0.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lwpolyline_unpaired_coordinate_dropped() {
        let doc = entities(
            "0\nLWPOLYLINE\n8\nKABEL\n10\n0.0\n20\n0.0\n10\n10.0\n42\n0.3\n10\n10.0\n20\n10.0\n",
        );
        match &doc.entities[0] {
            EntityType::LwPolyline(p) => {
                let points: Vec<Vector2> = p.vertices.iter().map(|v| v.location).collect();
                assert_eq!(points, vec![Vector2::new(0.0, 0.0), Vector2::new(10.0, 10.0)]);
                // the bulge followed an incomplete vertex and lands on the last complete one
                assert_eq!(p.vertices[0].bulge, 0.3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_line_without_end_point_skipped() {
        let doc = entities(
            "0\nLINE\n8\nKABEL\n10\n0.0\n20\n0.0\n30\n0.0\n\
             0\nLINE\n8\nKABEL\n10\n0.0\n20\n0.0\n11\n3.0\n21\n4.0\n",
        );
        assert_eq!(doc.entity_count(), 1);
        match &doc.entities[0] {
            EntityType::Line(l) => assert_eq!(l.end, Vector3::new(3.0, 4.0, 0.0)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_polyline_vertices_and_mesh() {
        let doc = entities(
            "0\nPOLYLINE\n8\nKABEL\n66\n1\n70\n0\n\
             0\nVERTEX\n10\n0.0\n20\n0.0\n0\nVERTEX\n10\n3.0\n20\n4.0\n0\nSEQEND\n\
             0\nPOLYLINE\n8\nMESH\n70\n64\n0\nVERTEX\n10\n0.0\n20\n0.0\n0\nSEQEND\n",
        );
        assert_eq!(doc.entity_count(), 2);
        let (points, closed) = doc.entities[0].path().unwrap();
        assert_eq!(points.len(), 2);
        assert!(!closed);
        let (mesh_points, _) = doc.entities[1].path().unwrap();
        assert!(mesh_points.is_empty());
    }

    #[test]
    fn test_texts_and_paper_space() {
        let doc = entities(
            "0\nTEXT\n8\nFELIRAT\n10\n5.0\n20\n5.0\n1\nNYY-J 3x2,5\n\
             0\nMTEXT\n8\nKERET\n67\n1\n10\n0.0\n20\n0.0\n3\nTervező:\n1\n\\PKiss\n",
        );
        assert_eq!(doc.entities[0].text().map(|(t, _)| t), Some("NYY-J 3x2,5"));
        assert!(doc.entities[1].is_paper_space());
        assert_eq!(doc.entities[1].text().map(|(t, _)| t), Some("Tervező:\nKiss"));
    }

    #[test]
    fn test_unsupported_entities_reported() {
        let doc = entities("0\nCIRCLE\n8\n0\n40\n1.0\n0\nCIRCLE\n8\n0\n0\nHATCH\n8\n0\n");
        assert_eq!(doc.entity_count(), 0);
        let messages: Vec<_> = doc.notifications.iter().map(|n| n.message.clone()).collect();
        assert_eq!(messages, vec!["2 CIRCLE entities skipped", "1 HATCH entities skipped"]);
    }
}
