//! Fixed legal text. Templated clauses use `{name}`-style tokens filled by the
//! compiler; everything else is emitted verbatim.

pub(crate) const DOCUMENT_TYPE: &str = "LAST WILL AND TESTAMENT";

pub(crate) const NOT_SPECIFIED: &str = "Not specified";
pub(crate) const TESTATOR_PLACEHOLDER: &str = "[TESTATOR NAME]";
pub(crate) const CITY_PLACEHOLDER: &str = "[CITY]";
pub(crate) const STATE_PLACEHOLDER: &str = "[STATE]";
pub(crate) const EXECUTOR_PLACEHOLDER: &str = "[EXECUTOR NAME]";

pub(crate) fn declaration(testator: &str, city: &str, state: &str) -> String {
    format!(
        "I, {testator}, a resident of {city}, {state}, being of sound mind and disposing \
         memory, and not acting under duress, menace, fraud, or undue influence, do hereby \
         make, publish, and declare this instrument to be my Last Will and Testament with \
         respect to my Bitcoin and other digital assets."
    )
}

pub(crate) const REVOCATION: &str = "I hereby revoke any and all wills, codicils, and other \
     testamentary instruments previously made by me, to the extent they dispose of the \
     digital assets described in this instrument.";

pub(crate) fn executor_appointment(executor: &str) -> String {
    format!(
        "I hereby nominate and appoint {executor} as Executor of this Will. My Executor shall \
         have full power and authority to access, secure, manage, transfer, and distribute \
         the digital assets described herein, including authority to use the wallet, \
         exchange, and key-storage information recorded in this instrument, without the \
         necessity of obtaining any court order. If my nominated Executor is unable or \
         unwilling to serve, I request that a court of competent jurisdiction appoint a \
         successor with the same powers."
    )
}

pub(crate) const NO_CONTEST: &str = "If any beneficiary under this Will, directly or \
     indirectly, contests this Will or any of its provisions in any court proceeding, any \
     share or interest given to that beneficiary under this Will is revoked and shall be \
     disposed of as if that beneficiary had predeceased me without descendants.";

pub(crate) const SIMULTANEOUS_DEATH: &str = "If any beneficiary under this Will and I die \
     simultaneously, or under circumstances in which the order of our deaths cannot be \
     established, or if any beneficiary fails to survive me by thirty (30) days, that \
     beneficiary shall be deemed to have predeceased me for all purposes of this Will.";

pub(crate) const TAXES: &str = "All estate, inheritance, and similar taxes, together with any \
     interest and penalties, payable by reason of my death with respect to the assets \
     disposed of by this Will, shall be paid by my Executor out of those assets before \
     distribution, without apportionment among beneficiaries except as required by law. My \
     Executor may liquidate digital assets to the extent reasonably necessary to satisfy \
     such obligations.";

pub(crate) const FIDUCIARY_PROTECTION: &str = "No Executor or other fiduciary acting under \
     this Will shall be liable for any loss or depreciation of digital assets resulting \
     from market volatility, the failure or insolvency of any exchange or custodian, the \
     loss or unavailability of private keys or recovery phrases, or any act or omission \
     taken in good faith, except for losses caused by that fiduciary's own willful \
     misconduct or gross negligence.";

pub(crate) fn attestation(testator: &str) -> String {
    format!(
        "IN WITNESS WHEREOF, I, {testator}, sign my name to this instrument and, being first \
         duly sworn, declare to the undersigned witnesses that I sign and execute it willingly \
         as my Last Will and Testament. We, the undersigned witnesses, each declare that the \
         testator signed this instrument in our presence, that we sign it as witnesses in the \
         presence of the testator and of each other, and that to the best of our knowledge \
         the testator is of sound mind and under no constraint or undue influence."
    )
}

pub(crate) const WARNINGS: [&str; 6] = [
    "Bitcoin and other digital assets are highly volatile and technical in nature.",
    "Private keys and seed phrases must be kept secure and must never be shared or \
     transmitted electronically.",
    "Loss of private keys or seed phrases results in permanent loss of access to the assets.",
    "Beneficiaries should seek assistance from qualified digital-asset professionals before \
     moving any funds.",
    "This instrument should be used together with a comprehensive estate plan prepared by a \
     qualified attorney.",
    "The tax consequences of inheriting digital assets should be reviewed with a tax \
     professional.",
];

pub(crate) const NOTARIZATION: &str = "On this _____ day of _____________, 20___, before me \
     personally appeared the above-named testator and witnesses, who proved to me on the basis \
     of satisfactory evidence to be the persons whose names are subscribed to the within \
     instrument and acknowledged to me that they executed the same in their authorized \
     capacities.";
