//! ArcGIS metadata schema
//!
//! The element layout of the metadata documents ArcGIS writes for datasets,
//! layers and services. Only the sections most tools read and edit are
//! declared; undeclared elements are kept untouched in the document.

use crate::schema::FieldSpec;
use crate::values::ValueType;
use once_cell::sync::Lazy;
use std::sync::Arc;

static METADATA: Lazy<Arc<FieldSpec>> = Lazy::new(build_metadata);

/// The shared root schema
pub fn metadata_schema() -> Arc<FieldSpec> {
    Arc::clone(&METADATA)
}

fn string() -> Arc<FieldSpec> {
    FieldSpec::value(ValueType::String)
}

/// Element with a single `value` attribute, the ArcGIS code list idiom
fn code() -> Arc<FieldSpec> {
    FieldSpec::group([("value", FieldSpec::attribute(ValueType::String))])
}

fn contact() -> Arc<FieldSpec> {
    FieldSpec::container(
        "Contact",
        [
            ("displayName", string()),
            ("rpIndName", string()),
            ("rpOrgName", string()),
            ("rpPosName", string()),
            ("role", FieldSpec::group([("RoleCd", code())])),
            (
                "rpCntInfo",
                FieldSpec::group([
                    (
                        "cntAddress",
                        FieldSpec::group([
                            ("addressType", FieldSpec::attribute(ValueType::String)),
                            ("delPoint", string()),
                            ("city", string()),
                            ("adminArea", string()),
                            ("postCode", string()),
                            ("eMailAdd", string()),
                            ("country", string()),
                        ]),
                    ),
                    (
                        "cntPhone",
                        FieldSpec::group([("voiceNum", string()), ("faxNum", string())]),
                    ),
                    ("cntHours", string()),
                    ("cntInstr", string()),
                ]),
            ),
        ],
    )
}

fn keywords() -> Arc<FieldSpec> {
    FieldSpec::container(
        "Keywords",
        [
            ("keyword", FieldSpec::list(string())),
            ("thesaName", FieldSpec::group([("resTitle", string())])),
        ],
    )
}

fn topic_category() -> Arc<FieldSpec> {
    FieldSpec::container("TpCat", [("TopicCatCd", code())])
}

fn online_resource() -> Arc<FieldSpec> {
    FieldSpec::container(
        "OnlineResource",
        [
            ("linkage", string()),
            ("protocol", string()),
            ("orName", string()),
            ("orDesc", string()),
        ],
    )
}

fn spatial_representation() -> Arc<FieldSpec> {
    FieldSpec::container(
        "SpatialRepresentation",
        [
            ("numDims", FieldSpec::value(ValueType::Integer)),
            ("cellGeoCd", FieldSpec::group([("CellGeoCd", code())])),
            ("tranParaAv", FieldSpec::value(ValueType::Boolean)),
        ],
    )
}

fn esri_section() -> Arc<FieldSpec> {
    FieldSpec::group([
        ("CreaDate", FieldSpec::text_container(ValueType::Date)),
        ("CreaTime", FieldSpec::text_container(ValueType::Time)),
        ("ArcGISFormat", string()),
        ("SyncOnce", FieldSpec::text_container(ValueType::Boolean)),
        ("ModDate", FieldSpec::text_container(ValueType::Date)),
        ("ModTime", FieldSpec::text_container(ValueType::Time)),
        (
            "scaleRange",
            FieldSpec::group([
                ("minScale", FieldSpec::text_container(ValueType::Integer)),
                ("maxScale", FieldSpec::text_container(ValueType::Integer)),
            ]),
        ),
        ("ArcGISProfile", string()),
    ])
}

fn data_identification(contact: &Arc<FieldSpec>) -> Arc<FieldSpec> {
    let keywords = keywords();
    let bound = || FieldSpec::text_container(ValueType::Decimal);

    FieldSpec::group([
        ("idAbs", string()),
        ("idPurp", string()),
        ("idCredit", string()),
        (
            "idCitation",
            FieldSpec::group([
                ("resTitle", string()),
                ("resAltTitle", string()),
                ("citRespParty", FieldSpec::list(Arc::clone(contact))),
                (
                    "date",
                    FieldSpec::group([
                        ("pubDate", FieldSpec::text_container(ValueType::DateTime)),
                        ("createDate", FieldSpec::text_container(ValueType::DateTime)),
                        ("reviseDate", FieldSpec::text_container(ValueType::DateTime)),
                    ]),
                ),
            ]),
        ),
        ("idPoC", Arc::clone(contact)),
        ("themeKeys", FieldSpec::list(Arc::clone(&keywords))),
        ("placeKeys", FieldSpec::list(Arc::clone(&keywords))),
        ("searchKeys", FieldSpec::list(keywords)),
        ("tpCat", FieldSpec::list(topic_category())),
        (
            "resConst",
            FieldSpec::group([("Consts", FieldSpec::group([("useLimit", string())]))]),
        ),
        ("dataLang", language()),
        (
            "dataExt",
            FieldSpec::group([
                ("exDesc", string()),
                (
                    "geoEle",
                    FieldSpec::group([(
                        "GeoBndBox",
                        FieldSpec::group([
                            ("exTypeCode", FieldSpec::value(ValueType::Integer)),
                            ("westBL", bound()),
                            ("eastBL", bound()),
                            ("southBL", bound()),
                            ("northBL", bound()),
                        ]),
                    )]),
                ),
            ]),
        ),
    ])
}

fn language() -> Arc<FieldSpec> {
    FieldSpec::group([("languageCode", code()), ("countryCode", code())])
}

fn build_metadata() -> Arc<FieldSpec> {
    let contact = contact();
    let spatial = spatial_representation();

    FieldSpec::container(
        "Metadata",
        [
            ("Esri", esri_section()),
            ("dataIdInfo", data_identification(&contact)),
            ("mdContact", Arc::clone(&contact)),
            ("mdDateSt", FieldSpec::text_container(ValueType::Date)),
            ("mdChar", FieldSpec::group([("CharSetCd", code())])),
            ("mdLang", language()),
            ("mdFileID", string()),
            (
                "distInfo",
                FieldSpec::group([(
                    "distTranOps",
                    FieldSpec::group([
                        ("transSize", FieldSpec::value(ValueType::Decimal)),
                        ("onLineSrc", FieldSpec::list(online_resource())),
                    ]),
                )]),
            ),
            (
                "spatRepInfo",
                FieldSpec::group([
                    ("GridSpatRep", Arc::clone(&spatial)),
                    ("Georect", spatial),
                ]),
            ),
            (
                "refSysInfo",
                FieldSpec::group([(
                    "RefSystem",
                    FieldSpec::group([(
                        "refSysID",
                        FieldSpec::group([("identCode", code()), ("idCodeSpace", string())]),
                    )]),
                )]),
            ),
            (
                "Binary",
                FieldSpec::group([(
                    "Thumbnail",
                    FieldSpec::group([(
                        "Data",
                        FieldSpec::group([
                            ("EsriPropertyType", FieldSpec::attribute(ValueType::String)),
                            ("text", FieldSpec::text(ValueType::String)),
                        ]),
                    )]),
                )]),
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    #[test]
    fn test_schema_is_valid() {
        metadata_schema().validate().unwrap();
    }

    #[test]
    fn test_schema_is_shared() {
        assert!(Arc::ptr_eq(&metadata_schema(), &metadata_schema()));
    }

    #[test]
    fn test_contact_type_is_reused() {
        let schema = metadata_schema();
        let info = schema.child("dataIdInfo").unwrap();
        let poc = info.child("idPoC").unwrap();
        let md_contact = schema.child("mdContact").unwrap();
        assert!(Arc::ptr_eq(poc, md_contact));

        let parties = info.child("idCitation").unwrap().child("citRespParty").unwrap();
        match parties.kind() {
            FieldKind::List(item) => assert!(poc.is_same_type(item)),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_spatial_representations_share_type() {
        let spat = metadata_schema();
        let spat = spat.child("spatRepInfo").unwrap();
        let grid = spat.child("GridSpatRep").unwrap();
        let georect = spat.child("Georect").unwrap();
        assert_eq!(grid.type_name(), "SpatialRepresentation");
        assert!(grid.is_same_type(georect));
    }

    #[test]
    fn test_section_order() {
        let schema = metadata_schema();
        let names: Vec<_> = schema.mapping().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Esri",
                "dataIdInfo",
                "mdContact",
                "mdDateSt",
                "mdChar",
                "mdLang",
                "mdFileID",
                "distInfo",
                "spatRepInfo",
                "refSysInfo",
                "Binary"
            ]
        );
    }
}
