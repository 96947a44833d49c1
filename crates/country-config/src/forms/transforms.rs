use std::collections::BTreeSet;

/// Mapping transforms recognised by the hosting application. A field mapping
/// naming anything else is rejected when the form is loaded.
#[derive(Debug, Clone)]
pub struct TransformCatalog {
    names: BTreeSet<&'static str>,
}

const STANDARD_TRANSFORMS: &[&str] = &[
    "addressFhirPropertyToFieldTransformer",
    "addressLineTemplateTransformer",
    "addressLineToFieldTransformer",
    "arrayToFieldTransformer",
    "bundleFieldToSectionFieldTransformer",
    "dateFormatTransformer",
    "eventAttachmentToFieldTransformer",
    "eventFieldToAttachmentTransformer",
    "eventLocationAddressLineTemplateTransformer",
    "eventLocationAddressOfflineTransformer",
    "eventLocationQueryTransformer",
    "fieldToAddressFhirPropertyTransformer",
    "fieldToAddressLineTransformer",
    "fieldToArrayTransformer",
    "fieldToIdentityTransformer",
    "fieldToNameTransformer",
    "fieldValueTransformer",
    "identityToFieldTransformer",
    "individualAddressTransformer",
    "longDateTransformer",
    "nameToFieldTransformer",
    "nationalityTransformer",
    "plainInputTransformer",
    "sectionFieldToBundleFieldTransformer",
    "selectTransformer",
];

impl TransformCatalog {
    pub fn standard() -> Self {
        Self {
            names: STANDARD_TRANSFORMS.iter().copied().collect(),
        }
    }

    pub fn with(mut self, name: &'static str) -> Self {
        self.names.insert(name);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl Default for TransformCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
